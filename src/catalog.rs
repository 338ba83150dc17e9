//! Department and issue-type catalog
//!
//! The catalog is the static table the data providers serve from. A built-in
//! copy is embedded at compile time and can be replaced by a JSON file on disk.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Maximum description length, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 255;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

/// Department identifier from the enumerated set (e.g. `DEV`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Department(String);

impl Department {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Human-readable label (`DEV` -> `Dev`)
    pub fn label(&self) -> String {
        display_label(&self.0)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issue type identifier, only meaningful inside one department
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueType(String);

impl IssueType {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> String {
        display_label(&self.0)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An issue type paired with its optional description template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTypeOption {
    #[serde(rename = "id")]
    pub issue_type: IssueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl IssueTypeOption {
    #[cfg(test)]
    pub fn new(id: &str, template: Option<&str>) -> Self {
        Self {
            issue_type: IssueType::new(id),
            template: template.map(str::to_string),
        }
    }

    /// Template text, treating an empty template as absent
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref().filter(|t| !t.is_empty())
    }

    pub fn label(&self) -> String {
        self.issue_type.label()
    }
}

/// One department with the issue types scoped to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentEntry {
    pub id: Department,
    pub issue_types: Vec<IssueTypeOption>,
}

/// Ordered department -> issue type -> template mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub departments: Vec<DepartmentEntry>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no departments")]
    Empty,
    #[error("department id must not be empty")]
    BlankDepartment,
    #[error("duplicate department {0}")]
    DuplicateDepartment(String),
    #[error("department {0} has no issue types")]
    NoIssueTypes(String),
    #[error("department {0} has an issue type with an empty id")]
    BlankIssueType(String),
    #[error("duplicate issue type {issue_type} in department {department}")]
    DuplicateIssueType {
        department: String,
        issue_type: String,
    },
    #[error("template for {issue_type} has {len} characters, limit is {limit}")]
    TemplateTooLong {
        issue_type: String,
        len: usize,
        limit: usize,
    },
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Catalog {
    /// The catalog shipped with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.departments.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen_departments = HashSet::new();
        for entry in &self.departments {
            let department = entry.id.id();
            if department.is_empty() {
                return Err(CatalogError::BlankDepartment);
            }
            if !seen_departments.insert(department) {
                return Err(CatalogError::DuplicateDepartment(department.to_string()));
            }
            if entry.issue_types.is_empty() {
                return Err(CatalogError::NoIssueTypes(department.to_string()));
            }

            let mut seen_types = HashSet::new();
            for option in &entry.issue_types {
                let issue_type = option.issue_type.id();
                if issue_type.is_empty() {
                    return Err(CatalogError::BlankIssueType(department.to_string()));
                }
                if !seen_types.insert(issue_type) {
                    return Err(CatalogError::DuplicateIssueType {
                        department: department.to_string(),
                        issue_type: issue_type.to_string(),
                    });
                }
                if let Some(template) = &option.template {
                    let len = template.chars().count();
                    if len > DESCRIPTION_MAX_CHARS {
                        return Err(CatalogError::TemplateTooLong {
                            issue_type: issue_type.to_string(),
                            len,
                            limit: DESCRIPTION_MAX_CHARS,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn departments(&self) -> Vec<Department> {
        self.departments.iter().map(|e| e.id.clone()).collect()
    }

    /// Issue types scoped to a department, `None` for an unknown department
    pub fn issue_types(&self, department: &Department) -> Option<&[IssueTypeOption]> {
        self.departments
            .iter()
            .find(|e| &e.id == department)
            .map(|e| e.issue_types.as_slice())
    }
}

/// Lower-case an identifier and capitalize its first letter
fn display_label(id: &str) -> String {
    let lower = id.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
