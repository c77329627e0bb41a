// src/handlers/vin.rs

use axum::{extract::Path, Json};

use crate::{
    middleware::auth::AuthenticatedUser,
    services::vin_decoder::{self, ModeloDecodificado},
};

// GET /api/vin/{codigo}
#[utoipa::path(
    get,
    path = "/api/vin/{codigo}",
    tag = "Motos",
    params(
        ("codigo" = String, Path, description = "VIN completo ou trecho com o VDS")
    ),
    responses(
        (status = 200, description = "Modelo decodificado (DESCONHECIDO quando não reconhece)", body = ModeloDecodificado)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn decodificar_vin(
    _user: AuthenticatedUser,
    Path(codigo): Path<String>,
) -> Json<ModeloDecodificado> {
    Json(vin_decoder::decodificar(&codigo))
}
