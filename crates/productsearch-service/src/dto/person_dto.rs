//! Person-related DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request to register a person.
///
/// Accepted as a JSON body or as query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddUserRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "productsearch_core::rules::not_blank")
    )]
    pub name: String,

    #[validate(
        length(min = 1, max = 255, message = "Email must be 1-255 characters"),
        custom(function = "productsearch_core::rules::not_blank")
    )]
    pub email: String,

    #[validate(
        length(min = 1, max = 255, message = "Phone must be 1-255 characters"),
        custom(function = "productsearch_core::rules::not_blank")
    )]
    pub phone: String,
}

/// Person response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonResponse {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Query parameters of the email lookup.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    /// Exact email address to match.
    pub email: String,
}
