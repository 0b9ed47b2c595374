//! PostgREST query builder.
//!
//! Filters follow PostgREST's `column=operator.value` form. Values are
//! percent-encoded when the query is attached to a [`Url`].

use std::fmt::Display;

use url::Url;

/// A table read or filtered write.
///
/// # Examples
/// ```
/// use icumbi::outbound::supabase::TableQuery;
///
/// let query = TableQuery::table("rooms")
///     .select("id,room_number")
///     .eq("status", "available")
///     .is_null("deleted_at")
///     .order("room_number", true);
/// assert_eq!(
///     query.params(),
///     vec![
///         ("select".to_owned(), "id,room_number".to_owned()),
///         ("status".to_owned(), "eq.available".to_owned()),
///         ("deleted_at".to_owned(), "is.null".to_owned()),
///         ("order".to_owned(), "room_number.asc".to_owned()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl TableQuery {
    /// Start a query against `table`.
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.table
    }

    /// Columns (and embedded resources) to return.
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    fn filter(mut self, column: impl Into<String>, expression: String) -> Self {
        self.filters.push((column.into(), expression));
        self
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(column, format!("eq.{value}"))
    }

    /// `column IN (values)`. Each value is double-quoted so commas and
    /// parentheses inside values survive.
    #[must_use]
    pub fn in_<I>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let list = values
            .into_iter()
            .map(|value| quote(&value.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        self.filter(column, format!("in.({list})"))
    }

    /// `column IS NULL`.
    #[must_use]
    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.filter(column, "is.null".to_owned())
    }

    /// `column IS NOT NULL`.
    #[must_use]
    pub fn not_null(self, column: impl Into<String>) -> Self {
        self.filter(column, "not.is.null".to_owned())
    }

    /// `column >= value`.
    #[must_use]
    pub fn gte(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(column, format!("gte.{value}"))
    }

    /// `column <= value`.
    #[must_use]
    pub fn lte(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(column, format!("lte.{value}"))
    }

    /// Append a sort key.
    #[must_use]
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{}.{direction}", column.into()));
        self
    }

    /// Cap the number of rows.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when the query filters rows; writes without filters are refused.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Query-string pairs in order: select, filters, order, limit.
    #[must_use]
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            params.push(("select".to_owned(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_owned(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }

    /// Attach the parameters to `url`, percent-encoding values.
    pub fn apply_to(&self, url: &mut Url) {
        let params = self.params();
        if params.is_empty() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &params {
            pairs.append_pair(key, value);
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', r"\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_filter_quotes_each_value() {
        let query = TableQuery::table("rooms").in_("property_id", ["a", "b,c"]);
        assert_eq!(
            query.params(),
            vec![("property_id".to_owned(), r#"in.("a","b,c")"#.to_owned())]
        );
    }

    #[test]
    fn values_are_percent_encoded_on_the_url() {
        let mut url = Url::parse("https://example.supabase.co/rest/v1/tenants").expect("url");
        TableQuery::table("tenants")
            .eq("full_name", "Ange & Co")
            .gte("created_at", "2024-06-01")
            .limit(5)
            .apply_to(&mut url);
        assert_eq!(
            url.query(),
            Some("full_name=eq.Ange+%26+Co&created_at=gte.2024-06-01&limit=5")
        );
    }

    #[test]
    fn multiple_sort_keys_join_into_one_order_param() {
        let query = TableQuery::table("payments")
            .order("payment_date", false)
            .order("id", true);
        assert_eq!(
            query.params(),
            vec![("order".to_owned(), "payment_date.desc,id.asc".to_owned())]
        );
        assert!(!query.has_filters());
    }

    #[test]
    fn not_null_negates() {
        let query = TableQuery::table("rooms").not_null("deleted_at");
        assert_eq!(
            query.params(),
            vec![("deleted_at".to_owned(), "not.is.null".to_owned())]
        );
    }
}
