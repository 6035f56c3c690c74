use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// The one failure the dashboard reports to the user
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Schedule unavailable: {0}")]
    ScheduleUnavailable(String),
}

impl DashboardError {
    /// Message shown to the user next to a retry button
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::ScheduleUnavailable(_) => {
                "Error al cargar los juegos. Por favor intente de nuevo."
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, DashboardError::ScheduleUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::ScheduleUnavailable("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
        assert!(err.is_retryable());
        assert!(err.user_message().contains("intente de nuevo"));

        let err = ConfigError::InvalidValue {
            key: "COUNTRY",
            value: "MX".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for COUNTRY: \"MX\"");
    }
}
