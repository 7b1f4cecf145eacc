// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Hop and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The hop command: scan, label, annotate, ask, jump, restore.
//!
//! One invocation walks `Idle → Scanning → Annotated → AwaitingInput →
//! {Resolved | Cancelled | Invalid} → Restored → Idle`. The prompt is the only suspension
//! point; the annotations are owned by an [`AnnotationGuard`] around it, so the document is
//! restored on every way out, including early returns and unwinding.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::annotate::{AnnotateError, AnnotationGuard, Annotator};
use crate::config::{ConfigError, HopConfig};
use crate::host::{Surface, SurfaceError};
use crate::labels::{gen_labels, HintAlphabet};
use crate::model::{Assignment, Label, Position};
use crate::scan::scan_surface;

pub const NO_ACTIVE_SURFACE: &str = "No active editor found.";
pub const INVALID_LABEL: &str = "Invalid label.";
pub const DOCUMENT_CHANGED: &str = "Document changed while awaiting a label.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopPhase {
    Idle,
    Scanning,
    Annotated,
    AwaitingInput,
    Resolved,
    Cancelled,
    Invalid,
    Restored,
}

impl fmt::Display for HopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Annotated => "annotated",
            Self::AwaitingInput => "awaiting-input",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
            Self::Invalid => "invalid",
            Self::Restored => "restored",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopOutcome {
    /// The cursor moved to the token carrying `label`.
    Jumped { label: Label, position: Position },
    /// The prompt was dismissed or submitted empty.
    Cancelled,
    /// The input matched no label; the user was told.
    Invalid { input: String },
    /// The document changed while the prompt was open, so the labels no longer pointed
    /// where they were drawn.
    Stale,
}

#[derive(Debug, Error)]
pub enum HopError {
    #[error("{NO_ACTIVE_SURFACE}")]
    NoActiveSurface,
    #[error("a hop is already waiting for input")]
    AlreadyActive,
    #[error("could not show labels: {0}")]
    Annotate(#[from] AnnotateError),
    #[error("restoring the document failed after {outcome:?}: {source}")]
    Restore {
        outcome: HopOutcome,
        #[source]
        source: SurfaceError,
    },
}

/// Single-slot marker for the in-flight invocation. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct InvocationSlot(Arc<AtomicBool>);

impl InvocationSlot {
    /// `None` while another ticket is alive.
    pub fn try_acquire(&self) -> Option<InvocationTicket> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InvocationTicket(Arc::clone(&self.0)))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Frees its [`InvocationSlot`] on drop.
#[derive(Debug)]
pub struct InvocationTicket(Arc<AtomicBool>);

impl Drop for InvocationTicket {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The labels and the lines they were found on, before anything is drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HopPlan {
    pub assignments: Vec<Assignment>,
    pub scanned_lines: Vec<usize>,
}

/// Finds the assignment whose label equals the lowered input.
pub fn resolve<'a>(assignments: &'a [Assignment], input: &str) -> Option<&'a Assignment> {
    let wanted = input.to_lowercase();
    assignments.iter().find(|assignment| assignment.label == wanted.as_str())
}

pub struct Hopper {
    config: HopConfig,
    alphabet: HintAlphabet,
    annotator: Box<dyn Annotator>,
    slot: InvocationSlot,
    phase: Cell<HopPhase>,
}

impl fmt::Debug for Hopper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hopper")
            .field("config", &self.config)
            .field("slot", &self.slot)
            .field("phase", &self.phase.get())
            .finish_non_exhaustive()
    }
}

impl Hopper {
    pub fn new(config: HopConfig) -> Result<Self, ConfigError> {
        let alphabet = config.alphabet()?;
        let annotator = config.strategy.annotator(config.label_style());
        Ok(Self {
            config,
            alphabet,
            annotator,
            slot: InvocationSlot::default(),
            phase: Cell::new(HopPhase::Idle),
        })
    }

    pub fn config(&self) -> &HopConfig {
        &self.config
    }

    pub fn slot(&self) -> InvocationSlot {
        self.slot.clone()
    }

    pub fn phase(&self) -> HopPhase {
        self.phase.get()
    }

    fn enter(&self, phase: HopPhase) {
        tracing::debug!(from = %self.phase.get(), to = %phase, "hop phase");
        self.phase.set(phase);
    }

    /// Scans the visible lines and labels every token found.
    pub fn plan(&self, surface: &dyn Surface) -> HopPlan {
        let scan = scan_surface(surface);
        let labels = gen_labels(scan.tokens.len(), self.config.label_scheme, &self.alphabet);
        HopPlan {
            assignments: Assignment::zip(labels, scan.tokens),
            scanned_lines: scan.lines,
        }
    }

    /// Runs one full hop against `surface`.
    ///
    /// Errors the user should see (unknown label, stale document, annotation failure) are
    /// reported through the surface. `NoActiveSurface` cannot be, so the caller reports it.
    pub fn invoke(&self, surface: Option<&mut dyn Surface>) -> Result<HopOutcome, HopError> {
        let Some(surface) = surface else {
            return Err(HopError::NoActiveSurface);
        };
        let Some(_ticket) = self.slot.try_acquire() else {
            tracing::debug!("hop rejected: another invocation is awaiting input");
            return Err(HopError::AlreadyActive);
        };

        let result = self.run(surface);
        self.enter(HopPhase::Idle);
        result
    }

    fn run(&self, surface: &mut dyn Surface) -> Result<HopOutcome, HopError> {
        self.enter(HopPhase::Scanning);
        let plan = self.plan(surface);
        tracing::debug!(
            tokens = plan.assignments.len(),
            lines = plan.scanned_lines.len(),
            strategy = %self.config.strategy,
            "hop scan finished"
        );

        let annotations =
            match self.annotator.apply(surface, &plan.assignments, &plan.scanned_lines) {
                Ok(annotations) => annotations,
                Err(err) => {
                    surface.show_error(&format!("Could not show labels: {err}"));
                    return Err(err.into());
                }
            };
        self.enter(HopPhase::Annotated);

        let mut guard = AnnotationGuard::new(surface, annotations);
        let version = guard.surface().document_version();

        self.enter(HopPhase::AwaitingInput);
        let input = guard.surface().prompt_for_line(&self.config.placeholder);
        let outcome = self.conclude(guard.surface(), &plan.assignments, input, version);

        guard.restore().map_err(|source| {
            tracing::warn!(%source, ?outcome, "hop restore failed");
            HopError::Restore {
                outcome: outcome.clone(),
                source,
            }
        })?;
        self.enter(HopPhase::Restored);

        Ok(outcome)
    }

    fn conclude(
        &self,
        surface: &mut dyn Surface,
        assignments: &[Assignment],
        input: Option<String>,
        version: u64,
    ) -> HopOutcome {
        let Some(input) = input.filter(|input| !input.is_empty()) else {
            self.enter(HopPhase::Cancelled);
            return HopOutcome::Cancelled;
        };

        if self.config.guard_document_edits && surface.document_version() != version {
            tracing::warn!(
                expected = version,
                actual = surface.document_version(),
                "document changed while awaiting a label"
            );
            self.enter(HopPhase::Invalid);
            surface.show_error(DOCUMENT_CHANGED);
            return HopOutcome::Stale;
        }

        match resolve(assignments, &input) {
            Some(assignment) => {
                self.enter(HopPhase::Resolved);
                let position = assignment.token.position();
                surface.set_cursor_and_reveal(position);
                HopOutcome::Jumped {
                    label: assignment.label.clone(),
                    position,
                }
            }
            None => {
                self.enter(HopPhase::Invalid);
                surface.show_error(INVALID_LABEL);
                HopOutcome::Invalid { input }
            }
        }
    }
}
