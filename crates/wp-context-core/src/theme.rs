//! Template detection for theme directories.

/// Template files WordPress's template hierarchy loads by name.
pub const CORE_TEMPLATES: &[&str] = &[
    "index.php",
    "single.php",
    "page.php",
    "archive.php",
    "category.php",
    "tag.php",
    "author.php",
    "search.php",
    "404.php",
    "front-page.php",
    "home.php",
    "singular.php",
];

pub const TEMPLATE_EXTENSION: &str = ".php";

/// Marker a custom page template carries in its header comment.
pub const TEMPLATE_NAME_MARKER: &str = "Template Name:";

/// A `.php` file is a template if it declares a template name or is one
/// of the core hierarchy files.
pub fn is_template(file_name: &str, contents: &str) -> bool {
    contents.contains(TEMPLATE_NAME_MARKER) || CORE_TEMPLATES.contains(&file_name)
}
