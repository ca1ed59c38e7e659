use geostac_core::models::Field;

/// What happened to one feature of a reconcile batch
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureOutcome {
    /// No matching field existed; a new one was inserted
    Created(Field),

    /// A matching field without imagery was looked up again
    ///
    /// The field keeps empty imagery when the catalog had no scene.
    Updated(Field),

    /// A matching field already had imagery; nothing was done
    AlreadyEnriched(Field),

    /// The name was already taken by a different geometry
    Conflict { name: String },

    /// The imagery catalog failed for this feature; nothing was written
    LookupFailed { name: String, reason: String },
}

impl FeatureOutcome {
    /// Stable snake_case label
    pub fn status(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::AlreadyEnriched(_) => "already_enriched",
            Self::Conflict { .. } => "conflict",
            Self::LookupFailed { .. } => "lookup_failed",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Created(field) | Self::Updated(field) | Self::AlreadyEnriched(field) => {
                &field.name
            }
            Self::Conflict { name } | Self::LookupFailed { name, .. } => name,
        }
    }

    /// The field involved, if one exists
    pub fn field(&self) -> Option<&Field> {
        match self {
            Self::Created(field) | Self::Updated(field) | Self::AlreadyEnriched(field) => {
                Some(field)
            }
            Self::Conflict { .. } | Self::LookupFailed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Conflict { .. } => Some("name already exists"),
            Self::LookupFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Whether this outcome wrote or returned a field for the caller
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Created(_) | Self::Updated(_))
    }
}

/// Counts per outcome kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub created: usize,
    pub updated: usize,
    pub already_enriched: usize,
    pub conflicts: usize,
    pub lookup_failures: usize,
}

/// Per-feature outcomes of a reconcile batch, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub outcomes: Vec<FeatureOutcome>,
}

impl ReconcileReport {
    /// Fields created or updated by the batch, in processing order
    pub fn fields(&self) -> Vec<&Field> {
        self.outcomes.iter().filter(|o| o.is_written()).filter_map(FeatureOutcome::field).collect()
    }

    /// Owned variant of [`ReconcileReport::fields`]
    pub fn into_fields(self) -> Vec<Field> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                FeatureOutcome::Created(field) | FeatureOutcome::Updated(field) => Some(field),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for outcome in &self.outcomes {
            match outcome {
                FeatureOutcome::Created(_) => summary.created += 1,
                FeatureOutcome::Updated(_) => summary.updated += 1,
                FeatureOutcome::AlreadyEnriched(_) => summary.already_enriched += 1,
                FeatureOutcome::Conflict { .. } => summary.conflicts += 1,
                FeatureOutcome::LookupFailed { .. } => summary.lookup_failures += 1,
            }
        }
        summary
    }
}

/// What happened to one feature of an insert-only batch
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Field),
    Conflict { name: String },
}

/// Per-feature outcomes of an insert-only batch, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertReport {
    pub outcomes: Vec<InsertOutcome>,
}

impl InsertReport {
    pub fn fields(&self) -> Vec<&Field> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                InsertOutcome::Inserted(field) => Some(field),
                InsertOutcome::Conflict { .. } => None,
            })
            .collect()
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                InsertOutcome::Inserted(field) => Some(field),
                InsertOutcome::Conflict { .. } => None,
            })
            .collect()
    }

    pub fn conflicts(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, InsertOutcome::Conflict { .. })).count()
    }
}
