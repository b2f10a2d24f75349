//! Voice HTTP Handlers
//!
//! 音色列表查询，驱动客户端的交互式补全；结果每次重新计算，
//! 不做额外缓存。

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::domain::voice::VoiceCategory;
use crate::infrastructure::http::dto::{ApiResponse, VoiceListQuery, VoiceResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 获取音色列表
///
/// 可按类别过滤（如 ?category=cloned），可按名称子串过滤
/// （?q=ra，大小写不敏感）。
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VoiceListQuery>,
) -> Result<Json<ApiResponse<Vec<VoiceResponse>>>, ApiError> {
    let voices = match &query.category {
        Some(category) => state
            .catalog
            .list_by_category(&VoiceCategory::parse(category)),
        None => state.catalog.snapshot().as_ref().clone(),
    };

    let needle = query.q.as_deref().map(str::to_lowercase);
    let responses: Vec<VoiceResponse> = voices
        .into_iter()
        .filter(|voice| match &needle {
            Some(needle) => voice.name().to_lowercase().contains(needle),
            None => true,
        })
        .map(|voice| VoiceResponse {
            id: voice.id().as_str().to_string(),
            name: voice.name().to_string(),
            category: voice.category().to_string(),
        })
        .collect();

    Ok(Json(ApiResponse::success(responses)))
}
