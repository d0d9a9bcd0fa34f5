//! Country listing, lookup, direct create and delete handlers.
//!
//! ```text
//! GET    /countries?region=Africa&currency=NGN&sort=gdp_desc
//! POST   /countries {"name":"Ghana","population":31072940,"currency_code":"GHS"}
//! GET    /countries/{name}
//! DELETE /countries/{name}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Country, CountryListQuery, NewCountry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::invalid_list_query;

/// Raw listing parameters; validated into a [`CountryListQuery`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCountriesParams {
    /// Region to match, case-insensitively.
    pub region: Option<String>,
    /// Currency code to match, case-insensitively.
    pub currency: Option<String>,
    /// One of `gdp_desc`, `gdp_asc`, `population_desc`, `population_asc`,
    /// `name_desc`, `name_asc`.
    pub sort: Option<String>,
}

/// Request body for `POST /countries`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateCountryRequest {
    #[schema(example = "Ghana")]
    pub name: Option<String>,
    #[schema(example = "Accra")]
    pub capital: Option<String>,
    #[schema(example = "Africa")]
    pub region: Option<String>,
    #[schema(example = 31_072_940)]
    pub population: Option<i64>,
    #[schema(example = "GHS")]
    pub currency_code: Option<String>,
    /// Local currency units per US dollar.
    #[schema(value_type = Option<String>, example = "11.95")]
    pub exchange_rate: Option<Decimal>,
    #[schema(example = "https://flagcdn.com/gh.svg")]
    pub flag_url: Option<String>,
}

impl From<CreateCountryRequest> for NewCountry {
    fn from(value: CreateCountryRequest) -> Self {
        Self {
            name: value.name,
            capital: value.capital,
            region: value.region,
            population: value.population,
            currency_code: value.currency_code,
            exchange_rate: value.exchange_rate,
            flag_url: value.flag_url,
        }
    }
}

/// List countries with optional filters and ordering.
#[utoipa::path(
    get,
    path = "/countries",
    params(ListCountriesParams),
    responses(
        (status = 200, description = "Matching countries", body = [Country]),
        (status = 400, description = "Invalid filter or sort", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["countries"],
    operation_id = "listCountries"
)]
#[get("/countries")]
pub async fn list_countries(
    state: web::Data<HttpState>,
    params: web::Query<ListCountriesParams>,
) -> ApiResult<web::Json<Vec<Country>>> {
    let params = params.into_inner();
    let query = CountryListQuery::parse(
        params.region.as_deref(),
        params.currency.as_deref(),
        params.sort.as_deref(),
    )
    .map_err(|errors| invalid_list_query(&errors))?;
    let countries = state.countries.list(&query).await?;
    Ok(web::Json(countries))
}

/// Create a single country; GDP is derived from the supplied rate.
#[utoipa::path(
    post,
    path = "/countries",
    request_body = CreateCountryRequest,
    responses(
        (status = 201, description = "Created country", body = Country),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 409, description = "Name already exists", body = ErrorSchema)
    ),
    tags = ["countries"],
    operation_id = "createCountry"
)]
#[post("/countries")]
pub async fn create_country(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCountryRequest>,
) -> ApiResult<HttpResponse> {
    let country = state
        .countries_command
        .create(NewCountry::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(country))
}

/// Fetch one country by case-insensitive name.
#[utoipa::path(
    get,
    path = "/countries/{name}",
    params(("name" = String, Path, description = "Country name")),
    responses(
        (status = 200, description = "Country", body = Country),
        (status = 404, description = "Country not found", body = ErrorSchema)
    ),
    tags = ["countries"],
    operation_id = "getCountry"
)]
#[get("/countries/{name}")]
pub async fn get_country(
    state: web::Data<HttpState>,
    name: web::Path<String>,
) -> ApiResult<web::Json<Country>> {
    let country = state.countries.get(&name).await?;
    Ok(web::Json(country))
}

/// Delete one country by case-insensitive name.
#[utoipa::path(
    delete,
    path = "/countries/{name}",
    params(("name" = String, Path, description = "Country name")),
    responses(
        (status = 200, description = "Country deleted", body = MessageResponse),
        (status = 404, description = "Country not found", body = ErrorSchema)
    ),
    tags = ["countries"],
    operation_id = "deleteCountry"
)]
#[delete("/countries/{name}")]
pub async fn delete_country(
    state: web::Data<HttpState>,
    name: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let deleted = state.countries_command.delete(&name).await?;
    Ok(web::Json(MessageResponse::new(format!(
        "Country \"{}\" deleted successfully",
        deleted.name
    ))))
}
