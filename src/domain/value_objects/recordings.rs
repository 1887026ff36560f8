use uuid::Uuid;

/// Filters for the owner-scoped recording list. Trash listing and normal
/// listing are mutually exclusive views of the same table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingListFilter {
    pub folder_id: Option<Uuid>,
    pub trashed: bool,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    /// Exact tag membership (inner-join semantics).
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}
