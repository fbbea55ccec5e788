//! Shared Diesel error mapping for the repository adapters.

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(super) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Unique violations are not special-cased here; repositories that surface
/// conflicts inspect the error with [`unique_violation_field`] first.
pub(super) fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
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

/// Column named by a unique violation, when the error is one.
///
/// The column is recovered from the constraint name, falling back to the
/// server message when the constraint name is not reported.
pub(super) fn unique_violation_field(
    error: &DieselError,
    columns: &[&'static str],
) -> Option<&'static str> {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = error else {
        return None;
    };
    field_from_info(info.as_ref(), columns)
}

fn field_from_info(
    info: &(dyn DatabaseErrorInformation + Send + Sync),
    columns: &[&'static str],
) -> Option<&'static str> {
    let haystack = info
        .constraint_name()
        .unwrap_or_else(|| info.message())
        .to_lowercase();
    columns
        .iter()
        .copied()
        .find(|column| haystack.contains(column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct Info {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, info: Info) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(info))
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(String),
    }

    #[rstest]
    #[case(Some("users_username_key"), "duplicate key", Some("username"))]
    #[case(Some("users_email_key"), "duplicate key", Some("email"))]
    #[case(None, "duplicate key value violates unique constraint \"users_email_key\"", Some("email"))]
    #[case(Some("users_pkey"), "duplicate key", None)]
    fn unique_violation_names_the_column(
        #[case] constraint: Option<&'static str>,
        #[case] message: &'static str,
        #[case] expected: Option<&'static str>,
    ) {
        let error = database_error(
            DatabaseErrorKind::UniqueViolation,
            Info {
                message,
                constraint,
            },
        );
        assert_eq!(
            unique_violation_field(&error, &["username", "email"]),
            expected
        );
    }

    #[rstest]
    fn other_errors_are_not_conflicts() {
        assert_eq!(
            unique_violation_field(&DieselError::NotFound, &["username"]),
            None
        );
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let error = database_error(
            DatabaseErrorKind::ClosedConnection,
            Info {
                message: "server closed the connection",
                constraint: None,
            },
        );
        let mapped = map_diesel_error(error, Mapped::Query, |message| {
            Mapped::Connection(message.to_owned())
        });
        assert_eq!(mapped, Mapped::Connection("database connection error".to_owned()));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped = map_diesel_error(DieselError::NotFound, Mapped::Query, |message| {
            Mapped::Connection(message.to_owned())
        });
        assert_eq!(mapped, Mapped::Query("record not found"));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }
}
