use super::ApiError;

pub const VALID_RATINGS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];

pub fn validate_id(id: i32, what: &str) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            what, id
        )));
    }
    Ok(id)
}

pub fn validate_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Name cannot be empty"));
    }
    if trimmed.len() > 100 {
        return Err(ApiError::validation("Name must be 100 characters or less"));
    }
    Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed.len() > 150 {
        return Err(ApiError::validation(
            "Email must be between 1 and 150 characters",
        ));
    }

    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(ApiError::validation(format!(
            "'{}' is not a valid email address",
            trimmed
        )));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ApiError::validation(format!(
            "'{}' is not a valid email address",
            trimmed
        )));
    }

    Ok(trimmed)
}

pub fn validate_title(title: &str) -> Result<&str, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Title cannot be empty"));
    }
    if trimmed.len() > 200 {
        return Err(ApiError::validation("Title must be 200 characters or less"));
    }
    Ok(trimmed)
}

pub fn validate_director(director: &str) -> Result<&str, ApiError> {
    let trimmed = director.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Director cannot be empty"));
    }
    if trimmed.len() > 150 {
        return Err(ApiError::validation(
            "Director must be 150 characters or less",
        ));
    }
    Ok(trimmed)
}

pub fn validate_genre(genre: &str) -> Result<&str, ApiError> {
    let trimmed = genre.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Genre cannot be empty"));
    }
    if trimmed.len() > 100 {
        return Err(ApiError::validation("Genre must be 100 characters or less"));
    }
    Ok(trimmed)
}

pub fn validate_runtime(minutes: i32) -> Result<i32, ApiError> {
    if minutes <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid runtime: {}. Runtime must be a positive number of minutes",
            minutes
        )));
    }
    Ok(minutes)
}

pub fn validate_year(year: i32) -> Result<i32, ApiError> {
    // 1888: the earliest surviving film
    if !(1888..=2100).contains(&year) {
        return Err(ApiError::validation(format!(
            "Invalid year: {}. Year must be between 1888 and 2100",
            year
        )));
    }
    Ok(year)
}

pub fn validate_rating(rating: &str) -> Result<&str, ApiError> {
    let trimmed = rating.trim();
    if trimmed.is_empty() || trimmed.len() > 10 {
        return Err(ApiError::validation(
            "Rating must be between 1 and 10 characters",
        ));
    }
    Ok(trimmed)
}

/// Stricter check for the `/movies/rating/{rating}` filter path.
pub fn validate_rating_class(rating: &str) -> Result<String, ApiError> {
    let upper = rating.trim().to_uppercase();
    if !VALID_RATINGS.contains(&upper.as_str()) {
        return Err(ApiError::validation(format!(
            "Invalid rating class. Use: {}",
            VALID_RATINGS.join(", ")
        )));
    }
    Ok(upper)
}

pub fn validate_synopsis(synopsis: &str) -> Result<&str, ApiError> {
    if synopsis.len() > 1000 {
        return Err(ApiError::validation(
            "Synopsis must be 1000 characters or less",
        ));
    }
    Ok(synopsis)
}

pub fn validate_limit(limit: u64, max: u64) -> Result<u64, ApiError> {
    if limit == 0 || limit > max {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between 1 and {}",
            limit, max
        )));
    }
    Ok(limit)
}
