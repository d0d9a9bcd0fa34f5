//! Diesel and pool error mapping onto [`CountryRepositoryError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::CountryRepositoryError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> CountryRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CountryRepositoryError::connection(message)
        }
    }
}

/// Map a Diesel failure; `duplicate_name` names the row when a unique
/// violation is expected.
pub(super) fn map_diesel_error(
    error: DieselError,
    duplicate_name: Option<&str>,
) -> CountryRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match (error, duplicate_name) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), Some(name)) => {
            CountryRepositoryError::duplicate(name)
        }
        (DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info), _) => {
            CountryRepositoryError::connection(info.message().to_owned())
        }
        (DieselError::DatabaseError(_, info), _) => {
            CountryRepositoryError::query(info.message().to_owned())
        }
        (other, _) => CountryRepositoryError::query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_errors_are_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, CountryRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn unique_violation_becomes_duplicate() {
        let error = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("duplicate key value violates unique constraint".to_owned()),
            ),
            Some("Chad"),
        );
        assert_eq!(error, CountryRepositoryError::duplicate("Chad"));
    }

    #[rstest]
    fn closed_connection_is_connection_error() {
        let error = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection,
                Box::new("server closed the connection".to_owned()),
            ),
            None,
        );
        assert!(matches!(error, CountryRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn other_errors_are_query_errors() {
        assert!(matches!(
            map_diesel_error(DieselError::NotFound, None),
            CountryRepositoryError::Query { .. }
        ));
    }
}
