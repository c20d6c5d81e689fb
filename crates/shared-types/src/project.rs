use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::permissions::CapabilitySet;
use crate::role::ProjectRole;

/// Working weekdays of a construction site.
///
/// Stored as a 7-bit mask (bit 0 = Monday) and serialized as named flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WorkingWeek {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Default for WorkingWeek {
    /// Monday to Friday.
    fn default() -> Self {
        Self::from_bits(0b001_1111)
    }
}

impl WorkingWeek {
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            monday: bits & 1 != 0,
            tuesday: bits & (1 << 1) != 0,
            wednesday: bits & (1 << 2) != 0,
            thursday: bits & (1 << 3) != 0,
            friday: bits & (1 << 4) != 0,
            saturday: bits & (1 << 5) != 0,
            sunday: bits & (1 << 6) != 0,
        }
    }

    pub const fn bits(&self) -> u8 {
        (self.monday as u8)
            | (self.tuesday as u8) << 1
            | (self.wednesday as u8) << 2
            | (self.thursday as u8) << 3
            | (self.friday as u8) << 4
            | (self.saturday as u8) << 5
            | (self.sunday as u8) << 6
    }

    pub fn includes(&self, day: Weekday) -> bool {
        self.bits() & (1 << day.num_days_from_monday()) != 0
    }

    pub fn days_per_week(&self) -> u32 {
        self.bits().count_ones()
    }

    /// Scheduled hours in one full week.
    pub fn weekly_hours(&self, hours_per_day: f64) -> f64 {
        hours_per_day * self.days_per_week() as f64
    }
}

/// Count working days in `start..=end`, skipping non-working weekdays and
/// project holidays. Returns 0 when `end` is before `start`.
pub fn working_days_between(
    start: NaiveDate,
    end: NaiveDate,
    week: &WorkingWeek,
    holidays: &[NaiveDate],
) -> u32 {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| week.includes(d.weekday()) && !holidays.contains(d))
        .count() as u32
}

/// A construction project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Project {
    /// Opaque primary key.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub working_week: WorkingWeek,
    pub hours_per_day: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn working_days_per_week(&self) -> u32 {
        self.working_week.days_per_week()
    }

    pub fn weekly_hours(&self) -> f64 {
        self.working_week.weekly_hours(self.hours_per_day)
    }
}

/// A project as seen by one user, joined with that user's role on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccessibleProject {
    #[serde(flatten)]
    pub project: Project,
    /// `None` when the stored role is not in the current vocabulary.
    pub role: Option<ProjectRole>,
}

impl AccessibleProject {
    pub fn id(&self) -> &str {
        &self.project.id
    }

    pub fn name(&self) -> &str {
        &self.project.name
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.role
            .map(|r| r.capabilities())
            .unwrap_or(CapabilitySet::NONE)
    }
}

/// (user, project, role) association.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectMembership {
    pub project_id: String,
    pub user_id: i64,
    pub role: ProjectRole,
}

/// A project member listed with their user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectMember {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: Option<ProjectRole>,
}

/// A non-working calendar day specific to one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectHoliday {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_hours_per_day() -> f64 {
    8.0
}

/// Request DTO for creating or updating a project.
///
/// On update, `holidays` replaces the project's holiday list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[cfg_attr(
    feature = "validation",
    validate(schema(function = "validate_schedule", skip_on_field_errors = false))
)]
pub struct ProjectRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 120, message = "Project name must be 1-120 characters"))
    )]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub working_week: WorkingWeek,
    #[serde(default = "default_hours_per_day")]
    #[cfg_attr(
        feature = "validation",
        validate(range(
            exclusive_min = 0.0,
            max = 24.0,
            message = "Hours per day must be greater than 0 and at most 24"
        ))
    )]
    pub hours_per_day: f64,
    #[serde(default)]
    pub holidays: Vec<ProjectHoliday>,
}

impl ProjectRequest {
    /// A request carrying only a name, with default calendar settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            description: None,
            location: None,
            start_date: None,
            end_date: None,
            working_week: WorkingWeek::default(),
            hours_per_day: default_hours_per_day(),
            holidays: Vec::new(),
        }
    }

    /// Prefill an update request from a stored project and its holidays.
    pub fn from_project(project: &Project, holidays: Vec<ProjectHoliday>) -> Self {
        Self {
            name: project.name.clone(),
            code: project.code.clone(),
            description: project.description.clone(),
            location: project.location.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            working_week: project.working_week,
            hours_per_day: project.hours_per_day,
            holidays,
        }
    }

    /// End date, when both are set, must not precede the start date.
    pub fn schedule_is_consistent(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => end >= start,
            _ => true,
        }
    }

    /// Trimmed name plus holidays sorted by date with duplicates dropped.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.holidays.sort_by_key(|h| h.date);
        self.holidays.dedup_by_key(|h| h.date);
        self
    }
}

#[cfg(feature = "validation")]
fn validate_schedule(req: &ProjectRequest) -> Result<(), validator::ValidationError> {
    if req.schedule_is_consistent() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("schedule")
            .with_message("End date cannot be before the start date".into()))
    }
}

/// Request DTO for assigning a project role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SetMemberRoleRequest {
    pub role: ProjectRole,
}

/// One row of the role table, for admin screens and API consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoleCapabilities {
    pub role: ProjectRole,
    pub label: String,
    pub admin_class: bool,
    pub field_role: bool,
    pub capabilities: CapabilitySet,
}

impl From<ProjectRole> for RoleCapabilities {
    fn from(role: ProjectRole) -> Self {
        Self {
            role,
            label: role.display_name().to_string(),
            admin_class: role.is_admin_class(),
            field_role: role.is_field_role(),
            capabilities: role.capabilities(),
        }
    }
}

/// Capabilities the caller holds on one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectCapabilities {
    pub project_id: String,
    pub role: Option<ProjectRole>,
    pub capabilities: CapabilitySet,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_week_is_monday_to_friday() {
        let week = WorkingWeek::default();
        assert_eq!(week.days_per_week(), 5);
        assert!(week.friday);
        assert!(!week.saturday);
        assert!(!week.sunday);
        assert_eq!(week.weekly_hours(8.0), 40.0);
    }

    #[test]
    fn bits_roundtrip_through_flags() {
        for bits in 0u8..128 {
            assert_eq!(WorkingWeek::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn six_day_week_with_half_hours() {
        let week = WorkingWeek {
            saturday: true,
            ..WorkingWeek::default()
        };
        assert_eq!(week.days_per_week(), 6);
        assert_eq!(week.weekly_hours(8.5), 51.0);
        assert!(week.includes(Weekday::Sat));
        assert!(!week.includes(Weekday::Sun));
    }

    #[test]
    fn working_days_skip_weekends_and_holidays() {
        // 2025-04-21 is Easter Monday; 2025-04-25 is Liberation Day.
        let week = WorkingWeek::default();
        let start = date(2025, 4, 21);
        let end = date(2025, 4, 27);
        assert_eq!(working_days_between(start, end, &week, &[]), 5);
        let holidays = [date(2025, 4, 21), date(2025, 4, 25)];
        assert_eq!(working_days_between(start, end, &week, &holidays), 3);
    }

    #[test]
    fn working_days_empty_when_range_inverted() {
        let week = WorkingWeek::default();
        assert_eq!(
            working_days_between(date(2025, 5, 2), date(2025, 5, 1), &week, &[]),
            0
        );
    }

    #[test]
    fn project_request_defaults_from_minimal_json() {
        let req: ProjectRequest = serde_json::from_str(r#"{"name":"Viadotto Nord"}"#).unwrap();
        assert_eq!(req, ProjectRequest::named("Viadotto Nord"));
        assert_eq!(req.hours_per_day, 8.0);
        assert!(req.holidays.is_empty());
    }

    #[test]
    fn update_request_prefills_from_project() {
        let ts = chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 1, 1, 0, 0, 0).unwrap();
        let project = Project {
            id: "p1".into(),
            name: "Ponte Sud".into(),
            code: Some("PS-01".into()),
            description: None,
            location: Some("Genova".into()),
            start_date: Some(date(2025, 3, 1)),
            end_date: None,
            working_week: WorkingWeek::from_bits(0b011_1111),
            hours_per_day: 9.0,
            created_at: ts,
            updated_at: ts,
        };
        let holidays = vec![ProjectHoliday { date: date(2025, 6, 2), description: None }];
        let req = ProjectRequest::from_project(&project, holidays.clone());
        assert_eq!(req.name, "Ponte Sud");
        assert_eq!(req.code.as_deref(), Some("PS-01"));
        assert_eq!(req.working_week, project.working_week);
        assert_eq!(req.hours_per_day, 9.0);
        assert_eq!(req.holidays, holidays);
    }

    #[test]
    fn schedule_consistency() {
        let mut req = ProjectRequest::named("A");
        assert!(req.schedule_is_consistent());
        req.start_date = Some(date(2025, 6, 1));
        req.end_date = Some(date(2025, 5, 1));
        assert!(!req.schedule_is_consistent());
        req.end_date = Some(date(2025, 6, 1));
        assert!(req.schedule_is_consistent());
    }

    #[test]
    fn normalized_trims_and_dedups_holidays() {
        let mut req = ProjectRequest::named("  Galleria  ");
        req.holidays = vec![
            ProjectHoliday { date: date(2025, 8, 15), description: None },
            ProjectHoliday { date: date(2025, 1, 6), description: Some("Epifania".into()) },
            ProjectHoliday { date: date(2025, 8, 15), description: Some("dup".into()) },
        ];
        let req = req.normalized();
        assert_eq!(req.name, "Galleria");
        let dates: Vec<NaiveDate> = req.holidays.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![date(2025, 1, 6), date(2025, 8, 15)]);
    }

    #[test]
    fn accessible_project_flattens_project_fields() {
        let json = r#"{
            "id": "p1", "name": "Depot", "hours_per_day": 8.0,
            "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z",
            "role": "foreman"
        }"#;
        let ap: AccessibleProject = serde_json::from_str(json).unwrap();
        assert_eq!(ap.id(), "p1");
        assert_eq!(ap.role, Some(ProjectRole::Foreman));
        assert_eq!(ap.project.working_week, WorkingWeek::default());
        assert!(!ap.capabilities().can_access_settings);
    }

    #[test]
    fn unrecognized_role_yields_no_capabilities() {
        let ap = AccessibleProject {
            project: serde_json::from_str(
                r#"{"id":"p","name":"n","hours_per_day":8.0,
                    "created_at":"2025-01-01T00:00:00Z","updated_at":"2025-01-01T00:00:00Z"}"#,
            )
            .unwrap(),
            role: None,
        };
        assert_eq!(ap.capabilities(), CapabilitySet::NONE);
    }

    #[test]
    fn role_capabilities_row_from_role() {
        let row = RoleCapabilities::from(ProjectRole::SiteManager);
        assert_eq!(row.label, "Site Manager");
        assert!(row.admin_class);
        assert!(!row.field_role);
        assert!(row.capabilities.can_manage_members);
    }
}
