//! # Forms
//!
//! Form profiles and the per-submission validation state machine.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  One field of one submission                            │
//! │                                                                         │
//! │   Unvalidated                                                           │
//! │       │  coerce (text → i64 / Money / present?)                         │
//! │       ├──────────────► CoercionFailed   (chain stops, error recorded)   │
//! │       ▼                                                                 │
//! │   CoerceOk                                                              │
//! │       │  validator chain (length, sign, choice, extension)              │
//! │       ├──────────────► Invalid          (first failure stops the chain) │
//! │       ▼                                                                 │
//! │   Valid ──► cross-reference pending? ──► resolved by bazaar-db          │
//! │                                             └──► Invalid on failure    │
//! │                                                                         │
//! │  Every field runs regardless of the others; errors are collected.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Profiles
//! | Form          | Profile  | Notes                                       |
//! |---------------|----------|---------------------------------------------|
//! | `ItemForm`    | strict   | image required on create, optional on edit  |
//! | `FilterForm`  | lenient  | everything optional, blank = "any"          |
//! | `CommentForm` | minimal  | content and item id required                |
//!
//! ## Usage
//! ```rust
//! use bazaar_core::form::{ItemForm, ItemFormInput, ItemProfile};
//! use bazaar_core::reference::Choices;
//!
//! let categories = Choices::new(vec![(1, "Food".into())]);
//! let subcategories = Choices::new(vec![(2, "Fruit".into())]);
//! let input = ItemFormInput {
//!     title: Some("Vintage Lamp".into()),
//!     description: Some("A nice old lamp for sale".into()),
//!     price: Some("12.50".into()),
//!     category: Some("1".into()),
//!     subcategory: Some("2".into()),
//!     image_filename: Some("lamp.png".into()),
//! };
//!
//! let mut submission = ItemForm::new(ItemProfile::Create).validate(&input, &categories, &subcategories);
//! for check in submission.take_pending() {
//!     // bazaar-db runs the COUNT query here
//!     submission.resolve(&check, true);
//! }
//! let item = submission.finish().unwrap();
//! assert_eq!(item.price.cents(), 1250);
//! ```

use serde::Deserialize;

use crate::error::ValidationError;
use crate::filter::{ListingFilter, PriceSort};
use crate::html;
use crate::money::Money;
use crate::reference::{Choices, CrossReference};
use crate::types::{Id, ItemDraft};
use crate::validation::{
    coerce_int, coerce_price, validate_choice, validate_image_filename, validate_length,
    validate_max_length, validate_price, validate_required, ValidationResult,
};
use crate::BLANK_CHOICE_VALUE;

/// Message for a missing required value that has no field-specific wording.
pub const FIELD_REQUIRED: &str = "This field is required.";

// =============================================================================
// Field State and Errors
// =============================================================================

/// Where a single field ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Unvalidated,
    CoercionFailed,
    CoerceOk,
    Invalid,
    Valid,
}

/// Per-field error messages, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: Vec<(&'static str, Vec<String>)>,
}

impl FormErrors {
    pub fn new() -> Self {
        FormErrors::default()
    }

    /// Appends a message to a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((field, vec![message])),
        }
    }

    /// Messages for one field (empty if none).
    pub fn get(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.entries
            .iter()
            .map(|(name, messages)| (*name, messages.as_slice()))
    }
}

// =============================================================================
// Submission
// =============================================================================

/// The result of running a form's pure validation.
///
/// Holds the field states, collected errors, the cleaned value (if every
/// field passed so far) and any cross-reference checks still to run.
#[derive(Debug, Clone)]
pub struct Submission<T> {
    states: Vec<(&'static str, FieldState)>,
    errors: FormErrors,
    value: Option<T>,
    pending: Vec<CrossReference>,
}

impl<T> Submission<T> {
    /// State of a field (`Unvalidated` if the form has no such field).
    pub fn state(&self, field: &str) -> FieldState {
        self.states
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, state)| *state)
            .unwrap_or(FieldState::Unvalidated)
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Cross-reference checks that still need the database.
    pub fn pending(&self) -> &[CrossReference] {
        &self.pending
    }

    /// Removes the pending checks so the caller can run them.
    pub fn take_pending(&mut self) -> Vec<CrossReference> {
        std::mem::take(&mut self.pending)
    }

    /// Records the outcome of a cross-reference check.
    pub fn resolve(&mut self, check: &CrossReference, exists: bool) {
        if exists {
            return;
        }
        let error = ValidationError::DoesNotBelong {
            message: check.message.clone(),
        };
        self.errors.add(check.field, error.to_string());
        self.set_state(check.field, FieldState::Invalid);
        self.value = None;
    }

    /// `Ok(value)` when every field is valid.
    ///
    /// Pending checks that were never resolved count as failures: a value is
    /// only released once the database has confirmed every relationship.
    pub fn finish(mut self) -> Result<T, FormErrors> {
        for check in std::mem::take(&mut self.pending) {
            self.resolve(&check, false);
        }
        match self.value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        }
    }

    fn set_state(&mut self, field: &'static str, state: FieldState) {
        match self.states.iter_mut().find(|(name, _)| *name == field) {
            Some((_, current)) => *current = state,
            None => self.states.push((field, state)),
        }
    }
}

/// Accumulates field outcomes while a form validates.
struct Collector {
    states: Vec<(&'static str, FieldState)>,
    errors: FormErrors,
}

impl Collector {
    fn new(fields: &[&'static str]) -> Self {
        Collector {
            states: fields
                .iter()
                .map(|field| (*field, FieldState::Unvalidated))
                .collect(),
            errors: FormErrors::new(),
        }
    }

    fn set(&mut self, field: &'static str, state: FieldState) {
        if let Some((_, current)) = self.states.iter_mut().find(|(name, _)| *name == field) {
            *current = state;
        }
    }

    /// Runs one field: coercion, then its validator chain.
    ///
    /// Returns the coerced value only if the whole chain passed.
    fn field<T>(
        &mut self,
        field: &'static str,
        coerce: impl FnOnce() -> ValidationResult<T>,
        validate: impl FnOnce(&T) -> ValidationResult<()>,
    ) -> Option<T> {
        let value = match coerce() {
            Ok(value) => value,
            Err(err) => {
                self.set(field, FieldState::CoercionFailed);
                self.errors.add(field, err.to_string());
                return None;
            }
        };
        self.set(field, FieldState::CoerceOk);

        match validate(&value) {
            Ok(()) => {
                self.set(field, FieldState::Valid);
                Some(value)
            }
            Err(err) => {
                self.set(field, FieldState::Invalid);
                self.errors.add(field, err.to_string());
                None
            }
        }
    }

    fn finish<T>(self, value: Option<T>, pending: Vec<CrossReference>) -> Submission<T> {
        let value = if self.errors.is_empty() { value } else { None };
        Submission {
            states: self.states,
            errors: self.errors,
            value,
            pending,
        }
    }
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|text| !text.trim().is_empty())
}

// =============================================================================
// Item Form (strict)
// =============================================================================

/// Which strict variant is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemProfile {
    /// Image required.
    Create,
    /// Image optional; the stored one is kept when none is sent.
    Edit,
}

/// Raw item form fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFormInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Original filename of the uploaded image, if a file was sent.
    #[serde(skip)]
    pub image_filename: Option<String>,
}

/// A fully validated item submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidItem {
    pub title: String,
    pub description: String,
    pub price: Money,
    pub category_id: Id,
    pub subcategory_id: Id,
    /// Original filename of a newly uploaded image.
    pub image_filename: Option<String>,
}

impl ValidItem {
    /// Row values with text escaped for storage.
    ///
    /// `image` is the stored filename: a freshly generated one, or the
    /// existing one on an edit without a new upload.
    pub fn into_draft(self, image: String) -> ItemDraft {
        ItemDraft {
            title: html::escape(&self.title),
            description: html::escape(&self.description),
            price: self.price,
            image,
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
        }
    }
}

/// The create/edit item form.
#[derive(Debug, Clone, Copy)]
pub struct ItemForm {
    profile: ItemProfile,
}

impl ItemForm {
    pub const FIELDS: &'static [&'static str] = &[
        "title",
        "description",
        "price",
        "image",
        "category",
        "subcategory",
    ];

    const TEXT_REQUIRED: &'static str = "Input is required!";

    pub fn new(profile: ItemProfile) -> Self {
        ItemForm { profile }
    }

    pub fn profile(&self) -> ItemProfile {
        self.profile
    }

    /// Runs every field. `categories` / `subcategories` are the eagerly
    /// loaded choices, without the blank option.
    pub fn validate(
        &self,
        input: &ItemFormInput,
        categories: &Choices,
        subcategories: &Choices,
    ) -> Submission<ValidItem> {
        let mut c = Collector::new(Self::FIELDS);

        let title = c.field(
            "title",
            || validate_required(input.title.as_deref(), Self::TEXT_REQUIRED).map(str::to_string),
            |title| validate_length(title, 5, 20),
        );

        let description = c.field(
            "description",
            || {
                validate_required(input.description.as_deref(), Self::TEXT_REQUIRED)
                    .map(str::to_string)
            },
            |description| validate_length(description, 5, 50),
        );

        let price = c.field(
            "price",
            || match present(&input.price) {
                Some(raw) => coerce_price(raw),
                None => Err(ValidationError::required(FIELD_REQUIRED)),
            },
            |price| validate_price(*price),
        );

        let image_required = self.profile == ItemProfile::Create;
        let image = c.field(
            "image",
            || match present(&input.image_filename) {
                Some(name) => Ok(Some(name.to_string())),
                None if image_required => Err(ValidationError::required(FIELD_REQUIRED)),
                None => Ok(None),
            },
            |name| match name {
                Some(name) => validate_image_filename(name),
                None => Ok(()),
            },
        );

        let category = c.field(
            "category",
            || required_choice(&input.category),
            |id| validate_choice(*id, categories),
        );

        let subcategory = c.field(
            "subcategory",
            || required_choice(&input.subcategory),
            |id| validate_choice(*id, subcategories),
        );

        let mut pending = Vec::new();
        if let (Some(subcategory_id), Some(category_id)) = (subcategory, category) {
            pending.push(CrossReference::subcategory_of(subcategory_id, category_id));
        }

        let value = match (title, description, price, image, category, subcategory) {
            (
                Some(title),
                Some(description),
                Some(price),
                Some(image_filename),
                Some(category_id),
                Some(subcategory_id),
            ) => Some(ValidItem {
                title,
                description,
                price,
                category_id,
                subcategory_id,
                image_filename,
            }),
            _ => None,
        };

        c.finish(value, pending)
    }
}

fn required_choice(raw: &Option<String>) -> ValidationResult<Id> {
    match present(raw) {
        Some(text) => coerce_int(text),
        None => Err(ValidationError::required(FIELD_REQUIRED)),
    }
}

fn optional_choice(raw: &Option<String>) -> ValidationResult<Id> {
    match present(raw) {
        Some(text) => coerce_int(text),
        None => Ok(BLANK_CHOICE_VALUE),
    }
}

// =============================================================================
// Filter Form (lenient)
// =============================================================================

/// Raw listing filter parameters (query string).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterFormInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: Option<String>,
}

/// The listing filter form.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterForm;

impl FilterForm {
    pub const FIELDS: &'static [&'static str] = &["title", "price", "category", "subcategory"];

    pub const TITLE_MAX: usize = 20;

    /// Options of the price sort select.
    pub fn price_choices() -> Choices {
        Choices::new(
            PriceSort::ALL
                .iter()
                .map(|sort| (sort.choice_value(), sort.label().to_string()))
                .collect(),
        )
    }

    /// Runs every field. Choices must include the blank option.
    pub fn validate(
        &self,
        input: &FilterFormInput,
        categories: &Choices,
        subcategories: &Choices,
    ) -> Submission<ListingFilter> {
        let mut c = Collector::new(Self::FIELDS);

        let title = c.field(
            "title",
            || Ok(input.title.clone().unwrap_or_default()),
            |title| validate_max_length(title, Self::TITLE_MAX),
        );

        let price_choices = Self::price_choices();
        let sort = c
            .field(
                "price",
                || optional_choice(&input.price),
                |value| validate_choice(*value, &price_choices),
            )
            .and_then(PriceSort::from_choice_value);

        let category = c.field(
            "category",
            || optional_choice(&input.category),
            |id| validate_choice(*id, categories),
        );

        let subcategory = c.field(
            "subcategory",
            || optional_choice(&input.subcategory),
            |id| validate_choice(*id, subcategories),
        );

        let mut pending = Vec::new();
        if let (Some(subcategory_id), Some(category_id)) = (subcategory, category) {
            if subcategory_id != BLANK_CHOICE_VALUE && category_id != BLANK_CHOICE_VALUE {
                pending.push(CrossReference::subcategory_of(subcategory_id, category_id));
            }
        }

        let non_blank = |id: Id| (id != BLANK_CHOICE_VALUE).then_some(id);
        let value = match (title, sort, category, subcategory) {
            (Some(title), Some(sort), Some(category), Some(subcategory)) => Some(ListingFilter {
                title: (!title.trim().is_empty()).then_some(title),
                category_id: non_blank(category),
                subcategory_id: non_blank(subcategory),
                sort,
            }),
            _ => None,
        };

        c.finish(value, pending)
    }
}

// =============================================================================
// Comment Form (minimal)
// =============================================================================

/// Raw comment form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentFormInput {
    pub content: Option<String>,
    pub item_id: Option<String>,
    /// `1` when the client wants only the rendered comment back.
    pub ajax: Option<String>,
}

impl CommentFormInput {
    /// Whether the submission asked for a fragment response.
    ///
    /// Anything that is not an integer counts as "no".
    pub fn is_ajax(&self) -> bool {
        self.ajax
            .as_deref()
            .and_then(|flag| flag.trim().parse::<i64>().ok())
            .is_some_and(|flag| flag != 0)
    }
}

/// A validated comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    /// Raw content as typed.
    pub content: String,
    pub item_id: Id,
}

impl ValidComment {
    /// Content as stored (escaped).
    pub fn stored_content(&self) -> String {
        html::escape(&self.content)
    }
}

/// The comment form.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentForm;

impl CommentForm {
    pub const FIELDS: &'static [&'static str] = &["content", "item_id"];

    pub fn validate(&self, input: &CommentFormInput) -> Submission<ValidComment> {
        let mut c = Collector::new(Self::FIELDS);

        let content = c.field(
            "content",
            || validate_required(input.content.as_deref(), "Input is required.").map(str::to_string),
            |_| Ok(()),
        );

        let item_id = c.field(
            "item_id",
            || match present(&input.item_id) {
                Some(raw) => raw
                    .trim()
                    .parse::<Id>()
                    .map_err(|_| ValidationError::coercion("Not a valid integer value.")),
                None => Err(ValidationError::required(FIELD_REQUIRED)),
            },
            |_| Ok(()),
        );

        let value = match (content, item_id) {
            (Some(content), Some(item_id)) => Some(ValidComment { content, item_id }),
            _ => None,
        };

        c.finish(value, Vec::new())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Choices {
        Choices::new(vec![
            (1, "Food".to_string()),
            (2, "Technology".to_string()),
            (3, "Books".to_string()),
        ])
    }

    fn subcategories() -> Choices {
        Choices::new(vec![
            (1, "Fruit".to_string()),
            (2, "Dairy".to_string()),
            (5, "Novels".to_string()),
        ])
    }

    fn lamp() -> ItemFormInput {
        ItemFormInput {
            title: Some("Vintage Lamp".to_string()),
            description: Some("A nice old lamp for sale".to_string()),
            price: Some("12.50".to_string()),
            category: Some("1".to_string()),
            subcategory: Some("2".to_string()),
            image_filename: Some("lamp.png".to_string()),
        }
    }

    fn create(input: &ItemFormInput) -> Submission<ValidItem> {
        ItemForm::new(ItemProfile::Create).validate(input, &categories(), &subcategories())
    }

    #[test]
    fn test_valid_item_waits_for_cross_reference() {
        let mut submission = create(&lamp());
        assert!(submission.errors().is_empty());
        assert_eq!(submission.state("subcategory"), FieldState::Valid);

        let pending = submission.take_pending();
        assert_eq!(pending, vec![CrossReference::subcategory_of(2, 1)]);
        submission.resolve(&pending[0], true);

        let item = submission.finish().unwrap();
        assert_eq!(item.title, "Vintage Lamp");
        assert_eq!(item.price, Money::from_cents(1250));
        assert_eq!(item.image_filename.as_deref(), Some("lamp.png"));
    }

    #[test]
    fn test_unresolved_cross_reference_never_validates() {
        let submission = create(&lamp());
        let errors = submission.finish().unwrap_err();
        assert_eq!(
            errors.get("subcategory"),
            ["Subcategory does not belong to that category."]
        );
    }

    #[test]
    fn test_failed_cross_reference_marks_field_invalid() {
        let mut input = lamp();
        input.subcategory = Some("5".to_string());
        let mut submission = create(&input);

        for check in submission.take_pending() {
            submission.resolve(&check, false);
        }
        assert_eq!(submission.state("subcategory"), FieldState::Invalid);
        let errors = submission.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        let expected = ValidationError::DoesNotBelong {
            message: "Subcategory does not belong to that category.".to_string(),
        };
        assert_eq!(errors.get("subcategory"), [expected.to_string()]);
    }

    #[test]
    fn test_title_and_description_bounds() {
        let cases = [
            ("Lamp".to_string(), false),
            ("Lamps".to_string(), true),
            ("x".repeat(20), true),
            ("x".repeat(21), false),
        ];
        for (title, ok) in cases {
            let mut input = lamp();
            input.title = Some(title.clone());
            let submission = create(&input);
            assert_eq!(submission.errors().get("title").is_empty(), ok, "title {title:?}");
        }

        let mut input = lamp();
        input.description = Some("x".repeat(51));
        let submission = create(&input);
        assert_eq!(
            submission.errors().get("description"),
            ["Input must be between 5 and 50 characters long"]
        );
        assert_eq!(submission.pending().len(), 1);
    }

    #[test]
    fn test_errors_collected_across_fields() {
        let input = ItemFormInput {
            title: Some("abc".to_string()),
            description: None,
            price: Some("-1".to_string()),
            category: Some("9".to_string()),
            subcategory: Some("x".to_string()),
            image_filename: Some("evil.exe".to_string()),
        };
        let submission = create(&input);

        assert_eq!(submission.errors().len(), 6);
        assert_eq!(submission.state("title"), FieldState::Invalid);
        assert_eq!(submission.state("description"), FieldState::CoercionFailed);
        assert_eq!(submission.state("price"), FieldState::Invalid);
        assert_eq!(submission.state("image"), FieldState::Invalid);
        assert_eq!(submission.state("category"), FieldState::Invalid);
        assert_eq!(submission.state("subcategory"), FieldState::CoercionFailed);
        assert_eq!(submission.errors().get("image"), ["Images only!"]);
        assert_eq!(submission.errors().get("category"), ["The chosen option does not exist."]);
        assert_eq!(submission.errors().get("subcategory"), ["Not a valid choice."]);
        assert_eq!(submission.errors().get("price"), ["Price must not be negative."]);
    }

    #[test]
    fn test_uncoerced_subcategory_skips_cross_reference() {
        let mut input = lamp();
        input.subcategory = Some("two".to_string());
        let submission = create(&input);
        assert!(submission.pending().is_empty());
    }

    #[test]
    fn test_blank_subcategory_rejected_on_create() {
        let mut input = lamp();
        input.subcategory = Some("0".to_string());
        let submission = create(&input);
        assert!(submission.pending().is_empty());
        assert_eq!(
            submission.errors().get("subcategory"),
            ["The chosen option does not exist."]
        );
    }

    #[test]
    fn test_image_required_only_on_create() {
        let mut input = lamp();
        input.image_filename = None;

        let submission = create(&input);
        assert_eq!(submission.errors().get("image"), [FIELD_REQUIRED]);

        let mut submission =
            ItemForm::new(ItemProfile::Edit).validate(&input, &categories(), &subcategories());
        for check in submission.take_pending() {
            submission.resolve(&check, true);
        }
        let item = submission.finish().unwrap();
        assert_eq!(item.image_filename, None);
    }

    #[test]
    fn test_price_messages() {
        let mut input = lamp();
        input.price = None;
        assert_eq!(create(&input).errors().get("price"), [FIELD_REQUIRED]);

        input.price = Some("cheap".to_string());
        assert_eq!(
            create(&input).errors().get("price"),
            ["Not a valid decimal value."]
        );

        input.price = Some("0".to_string());
        assert!(create(&input).errors().get("price").is_empty());
    }

    #[test]
    fn test_into_draft_escapes_text() {
        let item = ValidItem {
            title: "Tom & Jerry".to_string(),
            description: "<b>bold</b> claim".to_string(),
            price: Money::from_cents(100),
            category_id: 1,
            subcategory_id: 2,
            image_filename: None,
        };
        let draft = item.into_draft("stored.png".to_string());
        assert_eq!(draft.title, "Tom &amp; Jerry");
        assert_eq!(draft.description, "&lt;b&gt;bold&lt;/b&gt; claim");
        assert_eq!(draft.image, "stored.png");
    }

    // -------------------------------------------------------------------------
    // Filter form
    // -------------------------------------------------------------------------

    fn filter(input: &FilterFormInput) -> Submission<ListingFilter> {
        FilterForm.validate(
            input,
            &categories().with_blank(),
            &subcategories().with_blank(),
        )
    }

    #[test]
    fn test_empty_filter_is_valid_and_unfiltered() {
        let result = filter(&FilterFormInput::default()).finish().unwrap();
        assert_eq!(result, ListingFilter::default());
    }

    #[test]
    fn test_filter_title_has_no_minimum() {
        let input = FilterFormInput {
            title: Some("a".to_string()),
            ..Default::default()
        };
        let result = filter(&input).finish().unwrap();
        assert_eq!(result.title.as_deref(), Some("a"));

        let input = FilterFormInput {
            title: Some("x".repeat(21)),
            ..Default::default()
        };
        assert!(filter(&input).finish().is_err());
    }

    #[test]
    fn test_filter_whitespace_title_is_absent() {
        let input = FilterFormInput {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&input).finish().unwrap().title, None);
    }

    #[test]
    fn test_filter_cross_reference_only_when_both_set() {
        let only_sub = FilterFormInput {
            subcategory: Some("2".to_string()),
            category: Some("0".to_string()),
            ..Default::default()
        };
        let submission = filter(&only_sub);
        assert!(submission.pending().is_empty());
        assert_eq!(submission.finish().unwrap().subcategory_id, Some(2));

        let both = FilterFormInput {
            category: Some("3".to_string()),
            subcategory: Some("2".to_string()),
            ..Default::default()
        };
        let mut submission = filter(&both);
        let pending = submission.take_pending();
        assert_eq!(pending.len(), 1);
        submission.resolve(&pending[0], false);
        assert!(submission.finish().is_err());
    }

    #[test]
    fn test_filter_price_sort() {
        let input = FilterFormInput {
            price: Some("1".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&input).finish().unwrap().sort, PriceSort::Descending);

        let input = FilterFormInput {
            price: Some("2".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&input).finish().unwrap().sort, PriceSort::Ascending);

        let input = FilterFormInput {
            price: Some("7".to_string()),
            ..Default::default()
        };
        assert!(filter(&input).finish().is_err());
    }

    #[test]
    fn test_filter_unknown_category_invalid() {
        let input = FilterFormInput {
            category: Some("42".to_string()),
            ..Default::default()
        };
        let submission = filter(&input);
        assert_eq!(submission.state("category"), FieldState::Invalid);
        assert!(submission.finish().is_err());
    }

    // -------------------------------------------------------------------------
    // Comment form
    // -------------------------------------------------------------------------

    #[test]
    fn test_comment_form() {
        let input = CommentFormInput {
            content: Some("Is it <still> available?".to_string()),
            item_id: Some("4".to_string()),
            ajax: None,
        };
        let comment = CommentForm.validate(&input).finish().unwrap();
        assert_eq!(comment.item_id, 4);
        assert_eq!(comment.stored_content(), "Is it &lt;still&gt; available?");

        let empty = CommentFormInput {
            content: Some("  ".to_string()),
            item_id: Some("4".to_string()),
            ajax: Some("1".to_string()),
        };
        let errors = CommentForm.validate(&empty).finish().unwrap_err();
        assert_eq!(errors.get("content"), ["Input is required."]);
    }

    #[test]
    fn test_comment_ajax_flag() {
        let mut input = CommentFormInput::default();
        assert!(!input.is_ajax());
        input.ajax = Some("1".to_string());
        assert!(input.is_ajax());
        input.ajax = Some("0".to_string());
        assert!(!input.is_ajax());
        input.ajax = Some("yes".to_string());
        assert!(!input.is_ajax());
    }
}
