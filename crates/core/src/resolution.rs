//! Free-text beer resolution planning.
//!
//! Users may name a beer by typing it instead of starting from the beer's own
//! page. [`plan_resolution`] decides, without touching storage, whether the
//! submission refers to the context beer or to a beer looked up (and possibly
//! created) by name. The `db` crate executes the plan.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::{check_max_chars, non_blank, FieldErrors, NON_FIELD_ERRORS};

/// Default name for the brewery of beers created without one, and for their style.
pub const UNKNOWN: &str = "Unknown";

/// Longest beer name the catalog stores, in characters.
pub const MAX_BEER_NAME_CHARS: usize = 120;
/// Longest beer style the catalog stores, in characters.
pub const MAX_STYLE_CHARS: usize = 80;
/// Longest brewery name the catalog stores, in characters.
pub const MAX_BREWERY_NAME_CHARS: usize = 120;

/// Non-field message when a submission identifies no beer at all.
pub const MSG_BEER_REQUIRED: &str = "Beer name required or must originate from a beer's page.";

/// Raw beer identification as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct BeerReference {
    pub beer_name: Option<String>,
    pub style: Option<String>,
    pub brewery_name: Option<String>,
    /// The beer whose page the form was submitted from, if any.
    pub context_beer_id: Option<DbId>,
}

impl BeerReference {
    /// Reference anchored to a beer page with no free text.
    pub fn context(beer_id: DbId) -> Self {
        Self {
            context_beer_id: Some(beer_id),
            ..Self::default()
        }
    }

    /// Reference by free-text name only.
    pub fn named(beer_name: impl Into<String>) -> Self {
        Self {
            beer_name: Some(beer_name.into()),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_brewery(mut self, brewery_name: impl Into<String>) -> Self {
        self.brewery_name = Some(brewery_name.into());
        self
    }

    pub fn with_context(mut self, beer_id: DbId) -> Self {
        self.context_beer_id = Some(beer_id);
        self
    }
}

/// Placeholder values used when the user leaves style or brewery blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    pub brewery_name: String,
    pub style: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            brewery_name: UNKNOWN.to_string(),
            style: UNKNOWN.to_string(),
        }
    }
}

/// Everything needed to look up or create a beer by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeer {
    /// Trimmed beer name; matched case-insensitively.
    pub name: String,
    /// Style for a newly created beer. Ignored when the beer already exists.
    pub style: String,
    /// Exact brewery name to find or create for a newly created beer.
    pub brewery_name: String,
}

/// What a [`BeerReference`] resolves to before storage is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// Use the beer the user was viewing.
    Context(DbId),
    /// Find a beer by case-insensitive name, creating it if missing.
    ByName(NewBeer),
}

/// Length errors for the free-text fields of `reference`, keyed
/// `beer_name`, `style` and `brewery_name`.
pub fn validate_beer_reference(reference: &BeerReference) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let fields = [
        ("beer_name", &reference.beer_name, MAX_BEER_NAME_CHARS),
        ("style", &reference.style, MAX_STYLE_CHARS),
        ("brewery_name", &reference.brewery_name, MAX_BREWERY_NAME_CHARS),
    ];
    for (field, value, max_chars) in fields {
        if let Some(value) = value {
            check_max_chars(&mut errors, field, value, max_chars);
        }
    }
    errors
}

/// Decide how to resolve `reference`.
///
/// A non-blank `beer_name` always wins over the context beer. With neither,
/// the submission is rejected with a non-field error. Over-long free text is
/// rejected alongside it, so nothing reaches storage that the catalog would
/// refuse.
pub fn plan_resolution(
    reference: &BeerReference,
    sentinels: &Sentinels,
) -> Result<ResolutionPlan, CoreError> {
    let mut errors = validate_beer_reference(reference);

    let plan = if let Some(name) = non_blank(reference.beer_name.as_deref()) {
        Some(ResolutionPlan::ByName(NewBeer {
            name,
            style: non_blank(reference.style.as_deref())
                .unwrap_or_else(|| sentinels.style.clone()),
            brewery_name: non_blank(reference.brewery_name.as_deref())
                .unwrap_or_else(|| sentinels.brewery_name.clone()),
        }))
    } else {
        reference.context_beer_id.map(ResolutionPlan::Context)
    };

    if plan.is_none() {
        errors.add(NON_FIELD_ERRORS, MSG_BEER_REQUIRED);
    }
    match plan {
        Some(plan) if errors.is_empty() => Ok(plan),
        _ => Err(CoreError::InvalidInput(errors)),
    }
}

/// Outcome of a find-or-create: whether the entity pre-existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "entity", rename_all = "snake_case")]
pub enum Resolution<T> {
    Found(T),
    Created(T),
}

impl<T> Resolution<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Resolution::Found(v) | Resolution::Created(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Resolution::Found(v) | Resolution::Created(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Found(v) => Resolution::Found(f(v)),
            Resolution::Created(v) => Resolution::Created(f(v)),
        }
    }
}
