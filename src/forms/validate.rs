use crate::common::FormError;

pub fn required(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(())
}

/// Email validation
pub fn validate_email(email: &str) -> bool {
    let email = email.trim();

    if email.is_empty() || email.len() > 254 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.is_empty() || domain.contains('@') {
        return false;
    }

    // Domain must have at least one dot, not at either end
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Slug validation
pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > 255 {
        return false;
    }

    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Lowercase, hyphen-separated slug derived from a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Explicit slug when given (must be valid), else one derived from the title.
pub fn resolve_slug(explicit: Option<&str>, title: &str) -> Result<String, FormError> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) if validate_slug(slug) => Ok(slug.to_string()),
        Some(_) => Err(FormError::Invalid {
            field: "slug",
            reason: "use lowercase letters, digits, hyphens or underscores".to_string(),
        }),
        None => {
            let slug = slugify(title);
            if slug.is_empty() {
                return Err(FormError::Required("slug"));
            }
            Ok(slug)
        }
    }
}
