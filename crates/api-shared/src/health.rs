use crate::dto::HealthRes;

/// Health check shared by every API front end.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Returns a `HealthRes` indicating the service is up.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Medication service is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert!(!res.message.is_empty());
    }
}
