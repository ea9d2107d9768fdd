//! WordPress function completions.
//!
//! A fixed catalogue of hook, API and template functions, plus one
//! `get_posts` snippet per custom post type found in the installation.
//! Completions are only offered when the text before the cursor ends with
//! one of [`TRIGGER_PREFIXES`].

use serde::Serialize;

pub const TRIGGER_PREFIXES: &[&str] = &["add_", "wp_", "get_"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    Hook,
    Function,
    Template,
    PostType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    pub detail: String,
    pub insert_text: String,
}

const HOOK_FUNCTIONS: &[(&str, &str)] = &[
    ("add_action", "add_action( '${1:hook}', '${2:callback}' );"),
    ("add_filter", "add_filter( '${1:hook}', '${2:callback}' );"),
    ("add_shortcode", "add_shortcode( '${1:tag}', '${2:callback}' );"),
    ("add_theme_support", "add_theme_support( '${1:feature}' );"),
    ("add_meta_box", "add_meta_box( '${1:id}', '${2:title}', '${3:callback}' );"),
    ("add_menu_page", "add_menu_page( '${1:page_title}', '${2:menu_title}', '${3:capability}', '${4:slug}' );"),
];

const API_FUNCTIONS: &[(&str, &str)] = &[
    ("wp_enqueue_script", "wp_enqueue_script( '${1:handle}', ${2:src} );"),
    ("wp_enqueue_style", "wp_enqueue_style( '${1:handle}', ${2:src} );"),
    ("wp_insert_post", "wp_insert_post( ${1:\\$postarr} );"),
    ("wp_update_post", "wp_update_post( ${1:\\$postarr} );"),
    ("wp_delete_post", "wp_delete_post( ${1:\\$post_id} );"),
    ("wp_remote_get", "wp_remote_get( ${1:\\$url} );"),
    ("wp_send_json", "wp_send_json( ${1:\\$response} );"),
    ("get_option", "get_option( '${1:option}' );"),
    ("get_post_meta", "get_post_meta( ${1:\\$post_id}, '${2:key}', true );"),
    ("get_posts", "get_posts( ${1:\\$args} );"),
    ("get_current_user_id", "get_current_user_id();"),
];

const TEMPLATE_FUNCTIONS: &[(&str, &str)] = &[
    ("get_header", "get_header();"),
    ("get_footer", "get_footer();"),
    ("get_sidebar", "get_sidebar();"),
    ("get_template_part", "get_template_part( '${1:slug}' );"),
    ("get_the_title", "get_the_title();"),
    ("get_permalink", "get_permalink();"),
    ("wp_head", "wp_head();"),
    ("wp_footer", "wp_footer();"),
];

/// The prefix token the text before the cursor ends with, if any.
pub fn trigger(text_before_cursor: &str) -> Option<&'static str> {
    TRIGGER_PREFIXES
        .iter()
        .copied()
        .find(|p| text_before_cursor.ends_with(p))
}

fn items(table: &[(&str, &str)], kind: CompletionKind, detail: &str) -> Vec<CompletionItem> {
    table
        .iter()
        .map(|(label, insert)| CompletionItem {
            label: label.to_string(),
            kind,
            detail: detail.to_string(),
            insert_text: insert.to_string(),
        })
        .collect()
}

/// The static catalogue, hooks first.
pub fn static_items() -> Vec<CompletionItem> {
    let mut all = items(HOOK_FUNCTIONS, CompletionKind::Hook, "WordPress hook");
    all.extend(items(API_FUNCTIONS, CompletionKind::Function, "WordPress API"));
    all.extend(items(TEMPLATE_FUNCTIONS, CompletionKind::Template, "Template tag"));
    all
}

/// One query snippet per custom post type.
pub fn post_type_items(post_types: &[String]) -> Vec<CompletionItem> {
    post_types
        .iter()
        .map(|pt| CompletionItem {
            label: format!("get_posts_{}", pt),
            kind: CompletionKind::PostType,
            detail: format!("Query '{}' posts", pt),
            insert_text: format!(
                "get_posts( array( 'post_type' => '{}', 'numberposts' => ${{1:10}} ) );",
                pt
            ),
        })
        .collect()
}

/// Completions for the text before the cursor. Empty unless a trigger
/// prefix ends the text; otherwise every item whose label starts with it.
pub fn complete(text_before_cursor: &str, post_types: &[String]) -> Vec<CompletionItem> {
    let Some(prefix) = trigger(text_before_cursor) else {
        return Vec::new();
    };
    let mut all = static_items();
    all.extend(post_type_items(post_types));
    all.retain(|item| item.label.starts_with(prefix));
    all
}
