//! Response group service: template validation, CRUD, bulk import, and boot
//! seeding over the in-memory store.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::response_group::{
    CreateResponseGroup, ExtractField, ResponseGroup, ResponseGroupSummary, UpdateResponseGroup,
};
use crate::store::TemplateStore;

/// Filters for listing response groups.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResponseGroupFilters {
    /// Substring match on group_name.
    pub search: Option<String>,
    pub status_code: Option<i32>,
}

/// Result of a bulk import operation.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<ImportError>,
}

/// Individual import error.
#[derive(Debug, Serialize)]
pub struct ImportError {
    pub row: usize,
    pub group_name: Option<String>,
    pub message: String,
}

fn group_name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 _.\-]*$").expect("valid pattern"))
}

/// Validate a fully assembled template before it reaches the store.
///
/// The matcher assumes stored groups passed these checks, in particular that
/// configured marker pairs are complete and the mandatory number/amount pairs
/// are present.
fn validate_template(group: &ResponseGroup) -> Result<(), AppError> {
    if group.group_name.is_empty() {
        return Err(AppError::InvalidTemplate("group_name is required".to_string()));
    }
    if !group_name_pattern().is_match(&group.group_name) {
        return Err(AppError::InvalidTemplate(format!(
            "group_name '{}' may only contain letters, digits, spaces, '_', '.' and '-'",
            group.group_name
        )));
    }
    if group.txt_required.is_empty() {
        return Err(AppError::InvalidTemplate("txt_required is required".to_string()));
    }
    if group.status_code < 0 {
        return Err(AppError::InvalidTemplate(
            "status_code must be non-negative".to_string(),
        ));
    }
    if group.txt_not_required.as_deref() == Some(group.txt_required.as_str()) {
        return Err(AppError::InvalidTemplate(
            "txt_not_required must differ from txt_required".to_string(),
        ));
    }

    for field in ExtractField::ALL {
        let (before, after) = group.raw_markers(field);
        let before_set = before.is_some_and(|v| !v.is_empty());
        let after_set = after.is_some_and(|v| !v.is_empty());
        if before_set != after_set {
            return Err(AppError::InvalidTemplate(format!(
                "field '{}' has only one marker of its before/after pair",
                field.key()
            )));
        }
        if field.is_mandatory() && !before_set {
            return Err(AppError::InvalidTemplate(format!(
                "markers for mandatory field '{}' are required",
                field.key()
            )));
        }
    }

    Ok(())
}

/// Empty strings from the admin form mean "unset".
fn normalize(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| v.to_string())
}

/// Assemble a full record from a create payload.
fn build(input: &CreateResponseGroup, id: Uuid, created_at: DateTime<Utc>) -> ResponseGroup {
    ResponseGroup {
        id,
        group_name: input.group_name.trim().to_string(),
        txt_required: input.txt_required.clone(),
        txt_not_required: normalize(input.txt_not_required.as_deref()),
        txt_b_number: normalize(input.txt_b_number.as_deref()),
        txt_a_number: normalize(input.txt_a_number.as_deref()),
        txt_b_amount: normalize(input.txt_b_amount.as_deref()),
        txt_a_amount: normalize(input.txt_a_amount.as_deref()),
        txt_b_sn: normalize(input.txt_b_sn.as_deref()),
        txt_a_sn: normalize(input.txt_a_sn.as_deref()),
        txt_b_refid: normalize(input.txt_b_refid.as_deref()),
        txt_a_refid: normalize(input.txt_a_refid.as_deref()),
        txt_b_module_bal: normalize(input.txt_b_module_bal.as_deref()),
        txt_a_module_bal: normalize(input.txt_a_module_bal.as_deref()),
        txt_b_lapu_id: normalize(input.txt_b_lapu_id.as_deref()),
        txt_a_lapu_id: normalize(input.txt_a_lapu_id.as_deref()),
        txt_b_roffer: normalize(input.txt_b_roffer.as_deref()),
        txt_a_roffer: normalize(input.txt_a_roffer.as_deref()),
        status_code: input.status_code,
        created_at,
        updated_at: created_at,
    }
}

/// Create a new response group.
pub fn create(
    store: &TemplateStore,
    input: &CreateResponseGroup,
) -> Result<ResponseGroup, AppError> {
    input
        .validate()
        .map_err(|e| AppError::InvalidTemplate(e.to_string()))?;

    let group = build(input, Uuid::new_v4(), Utc::now());
    validate_template(&group)?;

    let created = store.insert(group)?;
    tracing::info!(group_name = %created.group_name, "Created response group");
    Ok(created)
}

/// Find a response group by ID.
pub fn find_by_id(store: &TemplateStore, id: Uuid) -> Result<ResponseGroup, AppError> {
    store
        .get(id)
        .ok_or_else(|| AppError::NotFound("Response group not found".to_string()))
}

/// List response groups with filters and pagination.
pub fn list(
    store: &TemplateStore,
    filters: &ResponseGroupFilters,
    pagination: &Pagination,
) -> PagedResult<ResponseGroupSummary> {
    let search = filters.search.as_deref().map(str::to_lowercase);
    let summaries: Vec<ResponseGroupSummary> = store
        .all()
        .iter()
        .filter(|g| {
            search
                .as_deref()
                .map_or(true, |s| g.group_name.to_lowercase().contains(s))
        })
        .filter(|g| {
            filters
                .status_code
                .map_or(true, |code| g.status_code == code)
        })
        .map(ResponseGroupSummary::from)
        .collect();

    PagedResult::paginate(summaries, pagination)
}

/// Update a response group by ID.
///
/// Absent payload fields keep their stored value; empty strings clear the
/// nullable text fields. The merged record is re-validated as a whole before
/// replacing the stored one.
pub fn update(
    store: &TemplateStore,
    id: Uuid,
    input: &UpdateResponseGroup,
) -> Result<ResponseGroup, AppError> {
    let mut group = find_by_id(store, id)?;

    if let Some(name) = &input.group_name {
        group.group_name = name.trim().to_string();
    }
    if let Some(txt) = &input.txt_required {
        group.txt_required = txt.clone();
    }
    if let Some(code) = input.status_code {
        group.status_code = code;
    }

    macro_rules! apply_text {
        ($($field:ident),+ $(,)?) => {
            $(
                if let Some(value) = &input.$field {
                    group.$field = normalize(Some(value.as_str()));
                }
            )+
        };
    }
    apply_text!(
        txt_not_required,
        txt_b_number,
        txt_a_number,
        txt_b_amount,
        txt_a_amount,
        txt_b_sn,
        txt_a_sn,
        txt_b_refid,
        txt_a_refid,
        txt_b_module_bal,
        txt_a_module_bal,
        txt_b_lapu_id,
        txt_a_lapu_id,
        txt_b_roffer,
        txt_a_roffer,
    );

    validate_template(&group)?;
    group.updated_at = Utc::now();

    let updated = store.replace(group)?;
    tracing::info!(group_name = %updated.group_name, "Updated response group");
    Ok(updated)
}

/// Delete a response group permanently.
pub fn delete(store: &TemplateStore, id: Uuid) -> Result<(), AppError> {
    let removed = store
        .remove(id)
        .ok_or_else(|| AppError::NotFound("Response group not found".to_string()))?;
    tracing::info!(group_name = %removed.group_name, "Deleted response group");
    Ok(())
}

/// Bulk import response groups from a JSON array, upserting by group_name.
pub fn import_bulk(store: &TemplateStore, inputs: &[CreateResponseGroup]) -> ImportResult {
    let mut created = 0usize;
    let mut updated = 0usize;
    let mut errors = Vec::new();

    for (i, input) in inputs.iter().enumerate() {
        match store.find_by_name(input.group_name.trim()) {
            Some(existing) => {
                let mut replacement = build(input, existing.id, existing.created_at);
                replacement.updated_at = Utc::now();
                match validate_template(&replacement).and_then(|_| store.replace(replacement)) {
                    Ok(_) => updated += 1,
                    Err(e) => errors.push(ImportError {
                        row: i + 1,
                        group_name: Some(input.group_name.clone()),
                        message: e.to_string(),
                    }),
                }
            }
            None => match create(store, input) {
                Ok(_) => created += 1,
                Err(e) => errors.push(ImportError {
                    row: i + 1,
                    group_name: Some(input.group_name.clone()),
                    message: e.to_string(),
                }),
            },
        }
    }

    ImportResult {
        total: inputs.len(),
        created,
        updated,
        errors,
    }
}

/// Load templates from a JSON seed file at boot.
///
/// Invalid entries are logged and skipped; a well-formed file with bad rows
/// still boots the service with the valid ones.
pub fn seed_from_file(store: &TemplateStore, path: &Path) -> Result<usize, AppError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| AppError::Internal(format!("Failed to read seed file: {e}")))?;
    let inputs: Vec<CreateResponseGroup> = serde_json::from_str(&data)
        .map_err(|e| AppError::Internal(format!("Invalid seed file JSON: {e}")))?;

    let result = import_bulk(store, &inputs);
    for error in &result.errors {
        tracing::warn!(row = error.row, error = %error.message, "Skipped seed template");
    }
    tracing::info!(
        loaded = result.created + result.updated,
        skipped = result.errors.len(),
        "Seeded response groups"
    );
    Ok(result.created + result.updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recharge_input(name: &str) -> CreateResponseGroup {
        CreateResponseGroup {
            group_name: name.to_string(),
            txt_required: "RCH".to_string(),
            txt_not_required: None,
            txt_b_number: Some("NUM:".to_string()),
            txt_a_number: Some(";".to_string()),
            txt_b_amount: Some("AMT:".to_string()),
            txt_a_amount: Some(";".to_string()),
            txt_b_sn: None,
            txt_a_sn: None,
            txt_b_refid: None,
            txt_a_refid: None,
            txt_b_module_bal: None,
            txt_a_module_bal: None,
            txt_b_lapu_id: None,
            txt_a_lapu_id: None,
            txt_b_roffer: None,
            txt_a_roffer: None,
            status_code: 10,
        }
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let store = TemplateStore::new();
        let group = create(&store, &recharge_input("airtel")).unwrap();
        assert_eq!(group.group_name, "airtel");
        assert_eq!(group.created_at, group.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_trims_group_name() {
        let store = TemplateStore::new();
        let group = create(&store, &recharge_input("  airtel  ")).unwrap();
        assert_eq!(group.group_name, "airtel");
    }

    #[test]
    fn create_rejects_empty_txt_required() {
        let store = TemplateStore::new();
        let mut input = recharge_input("airtel");
        input.txt_required = String::new();
        let err = create(&store, &input).unwrap_err();
        assert!(err.is_invalid_template());
    }

    #[test]
    fn create_rejects_bad_group_name() {
        let store = TemplateStore::new();
        let err = create(&store, &recharge_input("bad/name")).unwrap_err();
        assert!(err.is_invalid_template());
    }

    #[test]
    fn create_rejects_one_sided_pair() {
        let store = TemplateStore::new();
        let mut input = recharge_input("airtel");
        input.txt_b_sn = Some("SN:".to_string());
        let err = create(&store, &input).unwrap_err();
        assert!(err.is_invalid_template());
        assert!(err.to_string().contains("sn"));
    }

    #[test]
    fn create_rejects_missing_mandatory_pair() {
        let store = TemplateStore::new();
        let mut input = recharge_input("airtel");
        input.txt_b_amount = None;
        input.txt_a_amount = None;
        let err = create(&store, &input).unwrap_err();
        assert!(err.is_invalid_template());
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn create_rejects_self_cancelling_gates() {
        let store = TemplateStore::new();
        let mut input = recharge_input("airtel");
        input.txt_not_required = Some("RCH".to_string());
        let err = create(&store, &input).unwrap_err();
        assert!(err.is_invalid_template());
    }

    #[test]
    fn create_duplicate_name_conflicts() {
        let store = TemplateStore::new();
        create(&store, &recharge_input("airtel")).unwrap();
        let err = create(&store, &recharge_input("airtel")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn empty_optional_markers_are_stored_as_none() {
        let store = TemplateStore::new();
        let mut input = recharge_input("airtel");
        input.txt_b_sn = Some(String::new());
        input.txt_a_sn = Some(String::new());
        let group = create(&store, &input).unwrap();
        assert_eq!(group.txt_b_sn, None);
        assert_eq!(group.txt_a_sn, None);
    }

    #[test]
    fn update_merges_and_revalidates() {
        let store = TemplateStore::new();
        let group = create(&store, &recharge_input("airtel")).unwrap();

        let patch = UpdateResponseGroup {
            status_code: Some(20),
            txt_b_refid: Some("REF:".to_string()),
            txt_a_refid: Some(".".to_string()),
            ..Default::default()
        };
        let updated = update(&store, group.id, &patch).unwrap();
        assert_eq!(updated.status_code, 20);
        assert_eq!(updated.txt_b_refid.as_deref(), Some("REF:"));
        assert_eq!(updated.group_name, "airtel");
        assert_eq!(updated.created_at, group.created_at);
    }

    #[test]
    fn update_with_empty_string_clears_optional_field() {
        let store = TemplateStore::new();
        let mut input = recharge_input("airtel");
        input.txt_b_refid = Some("REF:".to_string());
        input.txt_a_refid = Some(".".to_string());
        let group = create(&store, &input).unwrap();

        let patch = UpdateResponseGroup {
            txt_b_refid: Some(String::new()),
            txt_a_refid: Some(String::new()),
            ..Default::default()
        };
        let updated = update(&store, group.id, &patch).unwrap();
        assert_eq!(updated.txt_b_refid, None);
        assert_eq!(updated.txt_a_refid, None);
    }

    #[test]
    fn update_cannot_break_mandatory_pair() {
        let store = TemplateStore::new();
        let group = create(&store, &recharge_input("airtel")).unwrap();

        let patch = UpdateResponseGroup {
            txt_b_number: Some(String::new()),
            txt_a_number: Some(String::new()),
            ..Default::default()
        };
        let err = update(&store, group.id, &patch).unwrap_err();
        assert!(err.is_invalid_template());
        // stored record is untouched
        assert_eq!(
            store.get(group.id).unwrap().txt_b_number.as_deref(),
            Some("NUM:")
        );
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = TemplateStore::new();
        let err = update(&store, Uuid::new_v4(), &UpdateResponseGroup::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_then_find_is_not_found() {
        let store = TemplateStore::new();
        let group = create(&store, &recharge_input("airtel")).unwrap();
        delete(&store, group.id).unwrap();
        assert!(find_by_id(&store, group.id).unwrap_err().is_not_found());
        assert!(delete(&store, group.id).unwrap_err().is_not_found());
    }

    #[test]
    fn list_filters_by_search_and_status() {
        let store = TemplateStore::new();
        create(&store, &recharge_input("airtel-success")).unwrap();
        create(&store, &recharge_input("jio-success")).unwrap();
        let mut failed = recharge_input("airtel-failed");
        failed.status_code = 20;
        create(&store, &failed).unwrap();

        let filters = ResponseGroupFilters {
            search: Some("AIRTEL".to_string()),
            status_code: None,
        };
        let page = list(&store, &filters, &Pagination::default());
        assert_eq!(page.total, 2);

        let filters = ResponseGroupFilters {
            search: Some("airtel".to_string()),
            status_code: Some(20),
        };
        let page = list(&store, &filters, &Pagination::default());
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].group_name, "airtel-failed");
    }

    #[test]
    fn import_creates_and_updates_by_name() {
        let store = TemplateStore::new();
        create(&store, &recharge_input("airtel")).unwrap();

        let mut changed = recharge_input("airtel");
        changed.status_code = 20;
        let mut invalid = recharge_input("broken");
        invalid.txt_b_amount = None;
        invalid.txt_a_amount = None;
        let inputs = vec![changed, recharge_input("jio"), invalid];

        let result = import_bulk(&store, &inputs);
        assert_eq!(result.total, 3);
        assert_eq!(result.created, 1);
        assert_eq!(result.updated, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 3);
        assert_eq!(store.find_by_name("airtel").unwrap().status_code, 20);
        assert!(store.find_by_name("jio").is_some());
        assert!(store.find_by_name("broken").is_none());
    }

    #[test]
    fn seed_from_file_loads_valid_rows() {
        use std::io::Write as _;

        let store = TemplateStore::new();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"group_name": "airtel", "txt_required": "RCH",
                  "txt_b_number": "NUM:", "txt_a_number": ";",
                  "txt_b_amount": "AMT:", "txt_a_amount": ";",
                  "status_code": 10}},
                {{"group_name": "", "txt_required": "X", "status_code": 0}}
            ]"#
        )
        .unwrap();

        let loaded = seed_from_file(&store, file.path()).unwrap();
        assert_eq!(loaded, 1);
        assert!(store.find_by_name("airtel").is_some());
    }

    #[test]
    fn seed_from_missing_file_errors() {
        let store = TemplateStore::new();
        let err = seed_from_file(&store, Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
