//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, catalog_handler};
use crate::domain::{Album, Singer, Song, Tag};
use crate::errors::{ErrorBody, ErrorResponse, FieldError};
use crate::requests::{
    CreateAlbum, CreateSinger, CreateSong, CreateTag, GetToken, LoginUser, RefreshToken,
    RegisterUser, TokenResponse,
};

/// OpenAPI documentation for the Karaoke API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Karaoke API",
        version = "0.1.0",
        description = "Accounts, token issuance and the karaoke song catalog",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register_user,
        auth_handler::login_user,
        auth_handler::get_token,
        auth_handler::refresh_token,
        auth_handler::revoke_token,
        catalog_handler::list_albums,
        catalog_handler::get_album,
        catalog_handler::create_album,
        catalog_handler::list_songs,
        catalog_handler::get_song,
        catalog_handler::create_song,
        catalog_handler::list_singers,
        catalog_handler::get_singer,
        catalog_handler::create_singer,
        catalog_handler::get_tag,
        catalog_handler::create_tag,
    ),
    components(
        schemas(
            RegisterUser,
            LoginUser,
            GetToken,
            RefreshToken,
            TokenResponse,
            CreateAlbum,
            CreateSong,
            CreateSinger,
            CreateTag,
            Album,
            Song,
            Singer,
            Tag,
            ErrorResponse,
            ErrorBody,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token lifecycle"),
        (name = "Catalog", description = "Singers, albums, songs and tags")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /Auth/Login"))
                        .build(),
                ),
            );
        }
    }
}
