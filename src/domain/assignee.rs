#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeCandidate {
    pub id: String,
    pub full_name: String,
}

impl AssigneeCandidate {
    pub fn from_names(id: impl Into<String>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: id.into(),
            full_name: format!("{first_name} {last_name}"),
        }
    }
}

/// Ordered set of assignee identifiers picked in the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssigneeSelection(Vec<String>);

impl AssigneeSelection {
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        let mut selection = Self::default();
        for id in ids {
            selection.insert(id);
        }
        selection
    }

    /// Returns false when the identifier was already selected.
    pub fn insert(&mut self, id: String) -> bool {
        if id.is_empty() || self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|selected| selected != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|selected| selected == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
