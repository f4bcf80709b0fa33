//! The fixed catalog of top-terms templates
//!
//! Each template is one [`TemplateDef`] entry in a static table; a single
//! render function turns an entry plus a [`TemplateInput`] into an
//! [`AnalyticalQuerySpec`]. Only the dataset and table identifiers, read once
//! from configuration, are interpolated into the text.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};
use tracing::instrument;

use crate::backend::{Operator, QueryParam};
use crate::error::{QueryError, Result};
use crate::query::{validate_identifier, AnalyticalQuerySpec, Query};

pub const PARAM_DATE: &str = "date";
pub const PARAM_COUNTRY: &str = "country_name";
pub const PARAM_INIT_DATE: &str = "init_date";
pub const PARAM_FINISH_DATE: &str = "finish_date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Template {
    TopTermsDay,
    TopTermsRange,
    TopRisingDay,
    TopRisingRange,
    TermsDateBounds,
    RisingDateBounds,
}

impl Template {
    pub fn def(self) -> &'static TemplateDef {
        &TEMPLATES[self as usize]
    }

    pub fn columns(self) -> &'static [OutputColumn] {
        self.def().columns
    }
}

/// Which of the two configured tables a template reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    TopTerms,
    TopRisingTerms,
}

/// Filter predicate shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// `refresh_date = @date AND country_name = @country_name`
    Day,
    /// `rank = 1 AND refresh_date BETWEEN @init_date AND @finish_date AND country_name = @country_name`
    Range,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    String,
    Integer,
    Float,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> OutputColumn {
    OutputColumn { name, kind }
}

#[derive(Debug)]
pub struct TemplateDef {
    pub template: Template,
    pub table: TableKind,
    /// `(expression, alias)` pairs
    pub projections: &'static [(&'static str, Option<&'static str>)],
    pub filter: FilterKind,
    pub group_by: &'static [&'static str],
    /// `(key, ascending)`
    pub order_by: Option<(&'static str, bool)>,
    pub columns: &'static [OutputColumn],
}

const TOP_TERM: (&str, Option<&str>) = ("term", Some("Top_Term"));
const DAY: (&str, Option<&str>) = ("refresh_date", Some("Day"));
const RANK: (&str, Option<&str>) = ("rank", None);
const GAIN: (&str, Option<&str>) = ("percent_gain", None);
const BOUNDS: [(&str, Option<&str>); 2] = [
    ("MIN(refresh_date)", Some("min_refresh_date")),
    ("MAX(refresh_date)", Some("max_refresh_date")),
];
const BOUND_COLUMNS: [OutputColumn; 2] = [
    col("min_refresh_date", ColumnKind::Date),
    col("max_refresh_date", ColumnKind::Date),
];

// Indexed by `Template as usize`.
static TEMPLATES: [TemplateDef; 6] = [
    TemplateDef {
        template: Template::TopTermsDay,
        table: TableKind::TopTerms,
        projections: &[TOP_TERM, RANK],
        filter: FilterKind::Day,
        group_by: &["Top_Term", "rank"],
        order_by: Some(("rank", true)),
        columns: &[col("Top_Term", ColumnKind::String), col("rank", ColumnKind::Integer)],
    },
    TemplateDef {
        template: Template::TopTermsRange,
        table: TableKind::TopTerms,
        projections: &[DAY, TOP_TERM],
        filter: FilterKind::Range,
        group_by: &["Day", "Top_Term"],
        order_by: Some(("Day", false)),
        columns: &[col("Day", ColumnKind::Date), col("Top_Term", ColumnKind::String)],
    },
    TemplateDef {
        template: Template::TopRisingDay,
        table: TableKind::TopRisingTerms,
        projections: &[TOP_TERM, RANK, GAIN],
        filter: FilterKind::Day,
        group_by: &["Top_Term", "rank", "percent_gain"],
        order_by: Some(("rank", true)),
        columns: &[
            col("Top_Term", ColumnKind::String),
            col("rank", ColumnKind::Integer),
            col("percent_gain", ColumnKind::Float),
        ],
    },
    TemplateDef {
        template: Template::TopRisingRange,
        table: TableKind::TopRisingTerms,
        projections: &[DAY, TOP_TERM, GAIN],
        filter: FilterKind::Range,
        group_by: &["Day", "Top_Term", "percent_gain"],
        order_by: Some(("Day", false)),
        columns: &[
            col("Day", ColumnKind::Date),
            col("Top_Term", ColumnKind::String),
            col("percent_gain", ColumnKind::Float),
        ],
    },
    TemplateDef {
        template: Template::TermsDateBounds,
        table: TableKind::TopTerms,
        projections: &BOUNDS,
        filter: FilterKind::None,
        group_by: &[],
        order_by: None,
        columns: &BOUND_COLUMNS,
    },
    TemplateDef {
        template: Template::RisingDateBounds,
        table: TableKind::TopRisingTerms,
        projections: &BOUNDS,
        filter: FilterKind::None,
        group_by: &[],
        order_by: None,
        columns: &BOUND_COLUMNS,
    },
];

/// Typed inputs for a template. Dates are `YYYY-MM-DD` strings and are not
/// validated here; a malformed date simply matches no rows upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateInput {
    Day {
        country: String,
        date: String,
    },
    Range {
        country: String,
        init_date: String,
        finish_date: String,
    },
    Bounds,
}

impl TemplateInput {
    fn kind(&self) -> FilterKind {
        match self {
            TemplateInput::Day { .. } => FilterKind::Day,
            TemplateInput::Range { .. } => FilterKind::Range,
            TemplateInput::Bounds => FilterKind::None,
        }
    }
}

impl FilterKind {
    fn describe(self) -> &'static str {
        match self {
            FilterKind::Day => "country and date",
            FilterKind::Range => "country and date range",
            FilterKind::None => "no",
        }
    }
}

/// Renders templates against the configured dataset and tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    dataset_id: String,
    top_terms_id: String,
    top_rising_terms_id: String,
}

impl Catalog {
    pub fn new(
        dataset_id: impl Into<String>,
        top_terms_id: impl Into<String>,
        top_rising_terms_id: impl Into<String>,
    ) -> Result<Self> {
        let catalog = Self {
            dataset_id: dataset_id.into(),
            top_terms_id: top_terms_id.into(),
            top_rising_terms_id: top_rising_terms_id.into(),
        };
        validate_identifier(&catalog.dataset_id)?;
        validate_identifier(&catalog.top_terms_id)?;
        validate_identifier(&catalog.top_rising_terms_id)?;
        Ok(catalog)
    }

    fn table_id(&self, table: TableKind) -> &str {
        match table {
            TableKind::TopTerms => &self.top_terms_id,
            TableKind::TopRisingTerms => &self.top_rising_terms_id,
        }
    }

    #[instrument(skip(self))]
    pub fn render(&self, template: Template, input: &TemplateInput) -> Result<AnalyticalQuerySpec> {
        let def = template.def();
        if input.kind() != def.filter {
            return Err(QueryError::InputMismatch {
                template: template.to_string(),
                expected: def.filter.describe(),
            });
        }

        let mut select = Query::select();
        for (expr, alias) in def.projections {
            select = select.field(expr, *alias);
        }
        select = select.from_table(&self.dataset_id, self.table_id(def.table))?;

        select = match input {
            TemplateInput::Day { country, date } => select
                .where_param("refresh_date", Operator::Eq, QueryParam::string(PARAM_DATE, date.as_str()))
                .where_param(
                    "country_name",
                    Operator::Eq,
                    QueryParam::string(PARAM_COUNTRY, country.as_str()),
                ),
            TemplateInput::Range {
                country,
                init_date,
                finish_date,
            } => select
                .where_literal("rank", Operator::Eq, 1)
                .where_between(
                    "refresh_date",
                    QueryParam::string(PARAM_INIT_DATE, init_date.as_str()),
                    QueryParam::string(PARAM_FINISH_DATE, finish_date.as_str()),
                )
                .where_param(
                    "country_name",
                    Operator::Eq,
                    QueryParam::string(PARAM_COUNTRY, country.as_str()),
                ),
            TemplateInput::Bounds => select,
        };

        for key in def.group_by {
            select = select.group_by(key);
        }
        if let Some((key, ascending)) = def.order_by {
            select = select.order_by_field(key, ascending);
        }

        select.build()
    }

    pub fn top_terms_day(&self, country: &str, date: &str) -> Result<AnalyticalQuerySpec> {
        self.render(Template::TopTermsDay, &day(country, date))
    }

    pub fn top_terms_range(&self, country: &str, init_date: &str, finish_date: &str) -> Result<AnalyticalQuerySpec> {
        self.render(Template::TopTermsRange, &range(country, init_date, finish_date))
    }

    pub fn top_rising_day(&self, country: &str, date: &str) -> Result<AnalyticalQuerySpec> {
        self.render(Template::TopRisingDay, &day(country, date))
    }

    pub fn top_rising_range(&self, country: &str, init_date: &str, finish_date: &str) -> Result<AnalyticalQuerySpec> {
        self.render(Template::TopRisingRange, &range(country, init_date, finish_date))
    }

    pub fn terms_date_bounds(&self) -> Result<AnalyticalQuerySpec> {
        self.render(Template::TermsDateBounds, &TemplateInput::Bounds)
    }

    pub fn rising_date_bounds(&self) -> Result<AnalyticalQuerySpec> {
        self.render(Template::RisingDateBounds, &TemplateInput::Bounds)
    }
}

fn day(country: &str, date: &str) -> TemplateInput {
    TemplateInput::Day {
        country: country.to_string(),
        date: date.to_string(),
    }
}

fn range(country: &str, init_date: &str, finish_date: &str) -> TemplateInput {
    TemplateInput::Range {
        country: country.to_string(),
        init_date: init_date.to_string(),
        finish_date: finish_date.to_string(),
    }
}
