//! Two-step request wizard: compose, then review and submit.
//!
//! The wizard exclusively owns the draft, the dirty flags, and the debounce
//! timer. Hosts (the TUI, tests) feed it edits and clock readings; it never
//! touches a terminal itself. Persistence and classification are injected,
//! so the whole state machine is unit-testable without a UI harness.
//!
//! Flow per keystroke: the host calls [`Wizard::set_description`], which
//! restarts the quiet-period timer; once the host's [`Wizard::tick`]
//! observes the timer firing, one extraction pass runs and merges into the
//! draft, but only into fields the user has not overridden.

use std::mem;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::classify::{Category, Classify};
use crate::debounce::Debounce;
use crate::draft::{DirtyFlags, Draft};
use crate::extract::extract;
use crate::store::{DraftStore, SessionStore};

/// Canned example descriptions, appliable from the compose step.
pub const SUGGESTIONS: &[&str] = &[
    "Need a calculus textbook tomorrow afternoon at the library help desk.",
    "Looking for ibuprofen, headache at Student Center around 5pm.",
    "Winter jacket, size M for tonight in the dorm courtyard.",
    "MacBook Pro charger at Clough Commons before 3pm.",
];

pub const COMPOSE_ERROR: &str = "Tell us what you need before continuing.";
pub const WHEN_ERROR: &str = "Add a time (e.g., Today 5PM)";
pub const WHERE_ERROR: &str = "Add a location (e.g., Student Center)";
pub const SUBMIT_NOTICE: &str = "Please add time and location before submitting.";

/// The two wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Compose,
    Review,
}

/// The extractable fields, in fixed focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    When,
    Where,
}

/// Per-field validation messages for the review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewErrors {
    pub when: Option<&'static str>,
    pub where_: Option<&'static str>,
}

impl ReviewErrors {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.when.is_none() && self.where_.is_none()
    }

    /// First invalid field in fixed `when` → `where` order, for focus.
    #[must_use]
    pub const fn first_invalid(&self) -> Option<Field> {
        if self.when.is_some() {
            Some(Field::When)
        } else if self.where_.is_some() {
            Some(Field::Where)
        } else {
            None
        }
    }
}

/// What a submit attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The final draft, handed off fire-and-forget. The wizard is already
    /// back to a fresh compose step with persisted state cleared.
    Submitted(Draft),
    /// Blocked: show the notice, render the per-field errors, and move
    /// focus to `focus`.
    Blocked {
        notice: &'static str,
        errors: ReviewErrors,
        focus: Field,
    },
}

/// The wizard state machine.
pub struct Wizard<S, C> {
    step: Step,
    draft: Draft,
    dirty: DirtyFlags,
    compose_error: Option<&'static str>,
    debounce: Debounce,
    store: DraftStore<S>,
    classifier: C,
}

impl<S: SessionStore, C: Classify> Wizard<S, C> {
    /// Create a wizard, hydrating from whatever the store holds.
    ///
    /// Persisted `when`/`where` values count as user-confirmed, so they
    /// start out dirty and survive the next extraction pass.
    pub fn new(store: S, classifier: C, quiet: Duration) -> Self {
        let store = DraftStore::new(store);
        let draft = store.load();
        let dirty = DirtyFlags {
            when: draft.when.is_some(),
            where_: draft.where_.is_some(),
        };
        Self {
            step: Step::Compose,
            draft,
            dirty,
            compose_error: None,
            debounce: Debounce::new(quiet),
            store,
            classifier,
        }
    }

    // -----------------------------------------------------------------------
    // Read-back for hosts
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    #[must_use]
    pub const fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    #[must_use]
    pub const fn compose_error(&self) -> Option<&'static str> {
        self.compose_error
    }

    /// Word count of the trimmed description.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.draft.description.split_whitespace().count()
    }

    /// Recomputed validation view of the review step.
    #[must_use]
    pub fn review_errors(&self) -> ReviewErrors {
        let when_ok = self
            .draft
            .when
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty());
        let where_ok = self
            .draft
            .where_
            .as_deref()
            .is_some_and(|v| v.trim().len() > 1);
        ReviewErrors {
            when: if when_ok { None } else { Some(WHEN_ERROR) },
            where_: if where_ok { None } else { Some(WHERE_ERROR) },
        }
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Update the raw description (every keystroke).
    ///
    /// Reclassifies immediately, restarts the debounce timer, and writes
    /// through. Clearing the text entirely resets both dirty flags; an
    /// empty request has nothing left worth protecting.
    pub fn set_description(&mut self, text: &str, now: Instant) {
        self.draft.description = text.to_string();
        self.reclassify();
        if self.draft.description.trim().is_empty() {
            self.dirty = DirtyFlags::default();
        } else {
            self.compose_error = None;
        }
        self.debounce.schedule(now);
        self.store.save(&self.draft);
    }

    /// Drive the debounce timer; runs at most one extraction pass.
    pub fn tick(&mut self, now: Instant) {
        if self.debounce.fire(now) {
            self.run_extraction();
        }
    }

    /// Direct user edit of `when` (marks it dirty unless cleared).
    pub fn set_when(&mut self, value: &str) {
        self.draft.set_when(value, &mut self.dirty);
        self.store.save(&self.draft);
    }

    /// Direct user edit of `where` (marks it dirty unless cleared).
    pub fn set_where(&mut self, value: &str) {
        self.draft.set_where(value, &mut self.dirty);
        self.store.save(&self.draft);
    }

    /// Replace the whole draft with a canned example.
    ///
    /// Suggestions always fully override manual edits: both dirty flags
    /// reset and the example's full extraction result lands atomically.
    pub fn apply_suggestion(&mut self, text: &str) {
        self.dirty = DirtyFlags::default();
        self.debounce.cancel();
        self.compose_error = None;

        self.draft = Draft {
            description: text.to_string(),
            ..Draft::default()
        };
        self.reclassify();
        let extracted = extract(&self.draft.description);
        self.draft.apply_extraction(&extracted, self.dirty);
        self.store.save(&self.draft);
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Advance compose → review.
    ///
    /// Blocked (returns false, compose error set) when the description is
    /// empty or whitespace. On success one synchronous extraction pass runs
    /// first, so review always reflects the latest text even when the
    /// quiet period had not elapsed yet.
    pub fn next(&mut self) -> bool {
        if self.step == Step::Review {
            return true;
        }
        if self.draft.description.trim().is_empty() {
            self.compose_error = Some(COMPOSE_ERROR);
            return false;
        }

        self.debounce.cancel();
        self.run_extraction();
        self.compose_error = None;
        self.step = Step::Review;
        true
    }

    /// Review → compose. No validation; state preserved as-is.
    pub fn back(&mut self) {
        self.step = Step::Compose;
    }

    /// Attempt to submit from the review step.
    pub fn submit(&mut self) -> SubmitOutcome {
        let errors = self.review_errors();
        if let Some(focus) = errors.first_invalid() {
            return SubmitOutcome::Blocked {
                notice: SUBMIT_NOTICE,
                errors,
                focus,
            };
        }

        let submitted = mem::take(&mut self.draft);
        self.dirty = DirtyFlags::default();
        self.debounce.cancel();
        self.compose_error = None;
        self.store.save(&self.draft);
        self.step = Step::Compose;
        debug!(category = %submitted.category, "draft submitted");
        SubmitOutcome::Submitted(submitted)
    }

    /// Start over from any state. Never gated by validation.
    pub fn reset(&mut self) {
        self.step = Step::Compose;
        self.draft = Draft::default();
        self.dirty = DirtyFlags::default();
        self.compose_error = None;
        self.debounce.cancel();
        self.store.save(&self.draft);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn reclassify(&mut self) {
        self.draft.category = if self.draft.description.trim().is_empty() {
            Category::default()
        } else {
            self.classifier.classify(&self.draft.description)
        };
    }

    /// One extraction pass: extract, merge per dirty flags, persist.
    /// A blank description never runs extraction (nothing to extract).
    fn run_extraction(&mut self) {
        if self.draft.description.trim().is_empty() {
            return;
        }
        let extracted = extract(&self.draft.description);
        debug!(when = %extracted.when, location = %extracted.where_, "extraction pass");
        self.draft.apply_extraction(&extracted, self.dirty);
        self.store.save(&self.draft);
    }
}
