//! Column names shared by the loading, merging and aggregation stages.

/// Referendum file columns.
pub const DEPARTMENT_CODE: &str = "Department code";
pub const REGISTERED: &str = "Registered";
pub const ABSTENTIONS: &str = "Abstentions";
pub const NULL: &str = "Null";
pub const CHOICE_A: &str = "Choice A";
pub const CHOICE_B: &str = "Choice B";

/// Vote counts in output order.
pub const VOTE_COLUMNS: [&str; 5] = [REGISTERED, ABSTENTIONS, NULL, CHOICE_A, CHOICE_B];

/// Reference file columns (regions and departments share `code`/`name`).
pub const CODE: &str = "code";
pub const NAME: &str = "name";
pub const REGION_CODE: &str = "region_code";

/// Region/department lookup columns.
pub const CODE_REG: &str = "code_reg";
pub const NAME_REG: &str = "name_reg";
pub const CODE_DEP: &str = "code_dep";
pub const NAME_DEP: &str = "name_dep";

/// Map result columns.
pub const RATIO: &str = "ratio";
pub const HAS_GEOMETRY: &str = "has_geometry";
