//! PostgreSQL-only query options.

use sqlkiln_core::dialect::AttributeValue;
use sqlkiln_core::Query;

use crate::dialect::{DISTINCT_ON, FOR_SHARE, FOR_UPDATE};

/// Row locks and `DISTINCT ON` for [`Query`].
pub trait PgsqlQueryExt: Sized {
    /// Appends `FOR SHARE`.
    #[must_use]
    fn lock_for_share(self) -> Self;

    /// Appends `FOR UPDATE`.
    #[must_use]
    fn lock_for_update(self) -> Self;

    /// Replaces `DISTINCT` with `DISTINCT ON (columns)`.
    #[must_use]
    fn distinct_on<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;
}

impl PgsqlQueryExt for Query {
    fn lock_for_share(self) -> Self {
        self.attribute("lock", FOR_SHARE)
    }

    fn lock_for_update(self) -> Self {
        self.attribute("lock", FOR_UPDATE)
    }

    fn distinct_on<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.attribute(
            "distinct",
            AttributeValue::dynamic(move |dialect| {
                dialect.clause(DISTINCT_ON, &[&dialect.quote_list(&columns)])
            }),
        )
    }
}
