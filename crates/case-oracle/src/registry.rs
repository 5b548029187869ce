//! Case registry: routines and their declared cases, in declaration order

use indexmap::{
    IndexMap,
    IndexSet,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
    instrument,
};

use crate::{
    error::RegistryError,
    literal::{
        CaseSpec,
        parse_case,
    },
    routine::{
        ParamKind,
        RoutineId,
    },
    tags::Tag,
};

/// Static declaration of one routine, as written next to it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub params: Vec<ParamKind>,
    pub tags: Vec<Tag>,
    pub cases: Vec<String>,
}

impl Declaration {
    pub fn new(
        name: impl Into<String>,
        params: impl IntoIterator<Item = ParamKind>,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
            ..Default::default()
        }
    }
    pub fn case(
        mut self,
        text: impl Into<String>,
    ) -> Self {
        self.cases.push(text.into());
        self
    }
    pub fn tag(
        mut self,
        tag: impl Into<Tag>,
    ) -> Self {
        self.tags.push(tag.into());
        self
    }
    pub fn routine_id(&self) -> RoutineId {
        RoutineId::new(self.name.clone(), self.params.len())
    }
}

/// A routine with its cases and tags. Read-only once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineEntry {
    pub id: RoutineId,
    pub params: Vec<ParamKind>,
    pub cases: Vec<CaseSpec>,
    pub tags: IndexSet<Tag>,
}

impl RoutineEntry {
    pub fn has_tag(
        &self,
        tag: &Tag,
    ) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseRegistry {
    pub(crate) entries: IndexMap<RoutineId, RoutineEntry>,
}

impl CaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from declarations, stopping at the first broken one.
    pub fn from_declarations<'d>(
        declarations: impl IntoIterator<Item = &'d Declaration>
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for declaration in declarations {
            registry.declare(declaration)?;
        }
        info!(
            routines = registry.len(),
            cases = registry.case_count(),
            "case registry built"
        );
        Ok(registry)
    }

    /// Parse the declared case texts and register them.
    #[instrument(level = "debug", skip(self, declaration), fields(routine = %declaration.name))]
    pub fn declare(
        &mut self,
        declaration: &Declaration,
    ) -> Result<&RoutineEntry, RegistryError> {
        let id = declaration.routine_id();
        let cases = declaration
            .cases
            .iter()
            .enumerate()
            .map(|(index, text)| {
                parse_case(text).map_err(|source| RegistryError::Malformed {
                    routine: id.clone(),
                    index,
                    text: text.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.register(
            id,
            declaration.params.clone(),
            declaration.tags.iter().cloned(),
            cases,
        )
    }

    /// Add cases and tags to a routine.
    ///
    /// Re-registering an identifier merges: tags are unioned and the new cases
    /// are appended after the existing ones. Nothing is overwritten.
    pub fn register(
        &mut self,
        id: RoutineId,
        params: Vec<ParamKind>,
        tags: impl IntoIterator<Item = Tag>,
        cases: Vec<CaseSpec>,
    ) -> Result<&RoutineEntry, RegistryError> {
        if params.len() != id.arity {
            return Err(RegistryError::SignatureArity {
                declared: params.len(),
                routine: id,
            });
        }
        for case in &cases {
            check_case(&id, &params, case)?;
        }
        if let Some(existing) = self.entries.get(&id) {
            if existing.params != params {
                return Err(RegistryError::SignatureConflict {
                    existing: existing.params.clone(),
                    found: params,
                    routine: id,
                });
            }
        }
        let entry = self.entries.entry(id.clone()).or_insert_with(|| {
            RoutineEntry {
                id: id.clone(),
                params,
                cases: Vec::new(),
                tags: IndexSet::new(),
            }
        });
        let appended = cases.len();
        entry.cases.extend(cases);
        entry.tags.extend(tags);
        debug!(
            routine = %entry.id,
            appended,
            total = entry.cases.len(),
            tags = ?entry.tags,
            "registered cases"
        );
        Ok(entry)
    }

    pub fn lookup(
        &self,
        id: &RoutineId,
    ) -> Option<&RoutineEntry> {
        self.entries.get(id)
    }

    /// First routine registered under `name`, whatever its arity.
    pub fn lookup_name(
        &self,
        name: &str,
    ) -> Option<&RoutineEntry> {
        self.entries.values().find(|entry| entry.id.name == name)
    }

    /// All routines in registration order.
    pub fn all_routines(&self) -> impl Iterator<Item = &RoutineEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn case_count(&self) -> usize {
        self.entries.values().map(|entry| entry.cases.len()).sum()
    }
}

fn check_case(
    id: &RoutineId,
    params: &[ParamKind],
    case: &CaseSpec,
) -> Result<(), RegistryError> {
    if case.arguments.len() != params.len() {
        return Err(RegistryError::ArityMismatch {
            routine: id.clone(),
            case: case.to_string(),
            found: case.arguments.len(),
        });
    }
    match params
        .iter()
        .zip(&case.arguments)
        .position(|(param, literal)| !param.accepts(literal))
    {
        Some(position) => Err(RegistryError::TypeMismatch {
            routine: id.clone(),
            case: case.to_string(),
            position,
            literal: case.arguments[position].to_string(),
            expected: params[position],
        }),
        None => Ok(()),
    }
}
