use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use blog_config::jwt::DEFAULT_COOKIE_NAME;
use blog_core::{PaginationMeta, PaginationParams};

use crate::middleware::unauthorized::UnauthorizedBody;
use crate::modules::articles::model::{
    Article, ArticleWithStats, CreateArticleDto, CreatedResponse, PaginatedArticlesResponse,
    UpdateArticleDto,
};
use crate::modules::comments::model::{
    Comment, CommentWithLikes, CreateCommentDto, UpdateCommentDto,
};
use crate::modules::likes::model::{LikeDto, LikeResponse};
use crate::modules::users::model::{
    ContactInfo, CreateUserDto, CreateUserResponse, Location, LoginRequest, LoginResponse,
    MessageResponse, PersonalInfo, UpdateContactInfoDto, UpdateLocationDto,
    UpdatePersonalInfoDto, UserProfile,
};

/// Body of every non-authentication error.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::login_user,
        crate::modules::users::controller::logout_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::update_contact_info,
        crate::modules::users::controller::update_personal_info,
        crate::modules::users::controller::update_location,
        crate::modules::articles::controller::create_article,
        crate::modules::articles::controller::get_articles,
        crate::modules::articles::controller::get_article,
        crate::modules::articles::controller::update_article,
        crate::modules::articles::controller::delete_article,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::get_article_comments,
        crate::modules::comments::controller::update_comment,
        crate::modules::comments::controller::delete_comment,
        crate::modules::likes::controller::toggle_like,
    ),
    components(
        schemas(
            ErrorResponse,
            UnauthorizedBody,
            Location,
            PersonalInfo,
            ContactInfo,
            UserProfile,
            CreateUserDto,
            CreateUserResponse,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            UpdateContactInfoDto,
            UpdatePersonalInfoDto,
            UpdateLocationDto,
            Article,
            ArticleWithStats,
            CreateArticleDto,
            UpdateArticleDto,
            CreatedResponse,
            PaginatedArticlesResponse,
            PaginationMeta,
            PaginationParams,
            Comment,
            CommentWithLikes,
            CreateCommentDto,
            UpdateCommentDto,
            LikeDto,
            LikeResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Accounts, profiles and sessions (user router)"),
        (name = "Articles", description = "Articles (resource router)"),
        (name = "Comments", description = "Comments on articles (resource router)"),
        (name = "Likes", description = "Likes on articles and comments (resource router)")
    ),
    info(
        title = "Blog API",
        version = "0.1.0",
        description = "Blog backend with cookie-carried JWT sessions and role-based access control.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(DEFAULT_COOKIE_NAME))),
            )
        }
    }
}
