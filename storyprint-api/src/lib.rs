//! # storyprint-api
//!
//! REST API server for the storyprint library
//!

mod api;

pub use api::{
    app, app_with_state, create_story, delete_story, export_text, get_story, health_check,
    paginate_text, story_pdf, AppError, AppState, CreateStoryRequest, ErrorResponse,
    ExportRequest, PaginateRequest, PaginateResponse, StoryResponse,
};
