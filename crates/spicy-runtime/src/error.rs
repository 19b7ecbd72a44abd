use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("the last argument of bind must be a function (found {found})")]
    InvalidCallback { found: &'static str },
}

impl BindError {
    #[must_use]
    pub fn invalid_callback(found: &'static str) -> Self {
        Self::InvalidCallback { found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_offending_kind() {
        let err = BindError::invalid_callback("int");
        assert_eq!(
            err.to_string(),
            "the last argument of bind must be a function (found int)"
        );
    }
}
