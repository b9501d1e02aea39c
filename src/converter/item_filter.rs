use crate::export::{FolderResolution, Item};

/// Which items pass the folder restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeRule {
    /// No `--filter` given.
    All,
    Folder(String),
    /// `--filter` named a folder that does not exist: nothing matches.
    Nothing,
}

impl IncludeRule {
    pub fn from_resolution(resolution: Option<&FolderResolution>) -> Self {
        match resolution {
            None => IncludeRule::All,
            Some(resolved) => match resolved.id() {
                Some(id) => IncludeRule::Folder(id.to_string()),
                None => IncludeRule::Nothing,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Included,
    SkippedNoLogin,
    Excluded,
    NotInFolder,
}

impl FilterDecision {
    pub fn is_included(self) -> bool {
        self == FilterDecision::Included
    }
}

#[derive(Debug, Clone)]
pub struct ItemFilter {
    include: IncludeRule,
    exclude: Option<String>,
}

impl ItemFilter {
    pub fn new(include: IncludeRule, exclude: Option<String>) -> Self {
        Self { include, exclude }
    }

    /// Builds a filter from resolved `--filter` / `--exclude` folder names.
    /// An unresolved exclude name excludes nothing.
    pub fn from_resolutions(
        filter: Option<&FolderResolution>,
        exclude: Option<&FolderResolution>,
    ) -> Self {
        Self::new(
            IncludeRule::from_resolution(filter),
            exclude.and_then(|r| r.id()).map(str::to_string),
        )
    }

    pub fn evaluate(&self, item: &Item) -> FilterDecision {
        if !item.is_login() {
            return FilterDecision::SkippedNoLogin;
        }

        if let Some(ref exclude_id) = self.exclude {
            if item.in_folder(exclude_id) {
                return FilterDecision::Excluded;
            }
        }

        match self.include {
            IncludeRule::All => FilterDecision::Included,
            IncludeRule::Folder(ref id) if item.in_folder(id) => FilterDecision::Included,
            IncludeRule::Folder(_) | IncludeRule::Nothing => FilterDecision::NotInFolder,
        }
    }

    pub fn include_rule(&self) -> &IncludeRule {
        &self.include
    }

    pub fn exclude_id(&self) -> Option<&str> {
        self.exclude.as_deref()
    }
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self::new(IncludeRule::All, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::LoginData;

    fn login_item(folder_id: Option<&str>) -> Item {
        Item {
            folder_id: folder_id.map(str::to_string),
            login: Some(LoginData::default()),
        }
    }

    fn note_item(folder_id: Option<&str>) -> Item {
        Item {
            folder_id: folder_id.map(str::to_string),
            login: None,
        }
    }

    #[test]
    fn test_no_restrictions() {
        let filter = ItemFilter::default();
        assert_eq!(filter.evaluate(&login_item(None)), FilterDecision::Included);
        assert_eq!(filter.evaluate(&login_item(Some("1"))), FilterDecision::Included);
    }

    #[test]
    fn test_items_without_login_always_skipped() {
        let filters = [
            ItemFilter::default(),
            ItemFilter::new(IncludeRule::Folder("1".to_string()), None),
            ItemFilter::new(IncludeRule::All, Some("1".to_string())),
            ItemFilter::new(IncludeRule::Nothing, Some("2".to_string())),
        ];

        for filter in &filters {
            assert_eq!(filter.evaluate(&note_item(None)), FilterDecision::SkippedNoLogin);
            assert_eq!(
                filter.evaluate(&note_item(Some("1"))),
                FilterDecision::SkippedNoLogin
            );
        }
    }

    #[test]
    fn test_include_folder() {
        let filter = ItemFilter::new(IncludeRule::Folder("1".to_string()), None);
        assert_eq!(filter.evaluate(&login_item(Some("1"))), FilterDecision::Included);
        assert_eq!(filter.evaluate(&login_item(Some("2"))), FilterDecision::NotInFolder);
        assert_eq!(filter.evaluate(&login_item(None)), FilterDecision::NotInFolder);
    }

    #[test]
    fn test_exclude_uses_strict_equality() {
        let filter = ItemFilter::new(IncludeRule::All, Some("abc".to_string()));
        assert_eq!(filter.evaluate(&login_item(Some("abc"))), FilterDecision::Excluded);
        assert_eq!(filter.evaluate(&login_item(Some("b"))), FilterDecision::Included);
        assert_eq!(filter.evaluate(&login_item(Some("abcd"))), FilterDecision::Included);
        assert_eq!(filter.evaluate(&login_item(None)), FilterDecision::Included);
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = ItemFilter::new(
            IncludeRule::Folder("1".to_string()),
            Some("1".to_string()),
        );
        assert_eq!(filter.evaluate(&login_item(Some("1"))), FilterDecision::Excluded);
    }

    #[test]
    fn test_unresolved_filter_matches_nothing() {
        let missing = FolderResolution::NotFound;
        let filter = ItemFilter::from_resolutions(Some(&missing), None);
        assert_eq!(filter.include_rule(), &IncludeRule::Nothing);
        assert_eq!(filter.evaluate(&login_item(None)), FilterDecision::NotInFolder);
        assert_eq!(filter.evaluate(&login_item(Some("1"))), FilterDecision::NotInFolder);
    }

    #[test]
    fn test_unresolved_exclude_excludes_nothing() {
        let missing = FolderResolution::NotFound;
        let filter = ItemFilter::from_resolutions(None, Some(&missing));
        assert_eq!(filter.exclude_id(), None);
        assert_eq!(filter.evaluate(&login_item(Some("1"))), FilterDecision::Included);
    }

    #[test]
    fn test_ambiguous_resolution_uses_first_id() {
        let ambiguous = FolderResolution::Ambiguous {
            id: "1".to_string(),
            matches: 2,
        };
        let filter = ItemFilter::from_resolutions(Some(&ambiguous), None);
        assert_eq!(filter.include_rule(), &IncludeRule::Folder("1".to_string()));
    }
}
