pub mod projects;

// Study definition
pub mod study_actions;
pub mod study_roots;
pub mod study_value_versions;
pub mod study_values;

// Selection history and current membership
pub mod study_selection_concepts;
pub mod study_selection_terms;
pub mod study_selections;
pub mod study_value_selections;

// Library
pub mod concept_roots;
pub mod concept_values;
pub mod ct_term_roots;

pub mod uid_counters;
