//! Shared error mapping from pool and Diesel failures to port errors.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a port's connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel error variants into query/connection constructors.
///
/// Closed connections map to the connection constructor; everything else is
/// a query error. Details are logged at debug level and kept out of the
/// returned message.
pub(crate) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::LeadRepositoryError;

    #[test]
    fn pool_errors_become_connection_errors() {
        let error = map_pool_error(
            PoolError::checkout("connection refused"),
            LeadRepositoryError::connection,
        );
        assert!(matches!(error, LeadRepositoryError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[test]
    fn closed_connections_become_connection_errors() {
        let error = map_diesel_error(
            diesel::result::Error::NotFound,
            LeadRepositoryError::query,
            LeadRepositoryError::connection,
        );
        assert!(matches!(error, LeadRepositoryError::Query { .. }));
    }
}
