use super::{aggregate, AggregationResult, VisitRecord};
use crate::domain::{Institution, InstitutionId, Role};
use getset::{CopyGetters, Getters};
use log::*;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Visibility window of a caller over visit data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessScope {
    /// Visits from every institution.
    Global,
    /// Only visits recorded at the given institution.
    Institution(InstitutionId),
}

impl AccessScope {
    /// Resolve scope for a user. Admins and analysts see everything, other
    /// users only their own institution. Users of other roles without an
    /// institution see nothing and get None.
    pub fn for_user(user: &UserProfile) -> Option<Self> {
        if user.role().sees_all_institutions() {
            return Some(AccessScope::Global);
        }
        user.institution().map(AccessScope::Institution)
    }

    /// True if a visit recorded at the given institution is visible.
    pub fn permits(&self, institution: InstitutionId) -> bool {
        match self {
            AccessScope::Global => true,
            AccessScope::Institution(id) => *id == institution,
        }
    }
}

impl fmt::Display for AccessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessScope::Global => write!(f, "global scope"),
            AccessScope::Institution(id) => write!(f, "institution #{}", id),
        }
    }
}

/// The part of a user account relevant to data visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, CopyGetters)]
pub struct UserProfile {
    #[getset(get = "pub")]
    username: String,
    #[getset(get_copy = "pub")]
    role: Role,
    #[getset(get_copy = "pub")]
    institution: Option<InstitutionId>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, role: Role, institution: Option<InstitutionId>) -> Self {
        UserProfile {
            username: username.into(),
            role,
            institution,
        }
    }
}

/// Persistence collaborator that owns visit records.
///
/// Implementations are responsible for enforcing the scope: `visits` must
/// return nothing the scope does not permit.
pub trait VisitSource {
    /// Visits visible under the given scope, newest first.
    fn visits(&self, scope: &AccessScope) -> Vec<VisitRecord>;

    /// Display name of an institution, if known.
    fn institution_name(&self, _id: InstitutionId) -> Option<String> {
        None
    }
}

/// Compute dashboard statistics for a scope. Filtering happens in the source,
/// counting in [`aggregate`].
pub fn statistics<S: VisitSource + ?Sized>(source: &S, scope: &AccessScope) -> AggregationResult {
    let visits = source.visits(scope);
    aggregate(&visits, scope)
}

/// Compute dashboard statistics for a user. Users without any visibility get
/// empty statistics.
pub fn statistics_for_user<S: VisitSource + ?Sized>(source: &S, user: &UserProfile) -> AggregationResult {
    match AccessScope::for_user(user) {
        Some(scope) => statistics(source, &scope),
        None => {
            info!(target: "stats", "user {:?} has no visible institution", user.username());
            AggregationResult::default()
        }
    }
}

/// In-memory visit store.
#[derive(Debug, Clone, Default)]
pub struct VisitLog {
    institutions: BTreeMap<InstitutionId, Institution>,
    visits: Vec<VisitRecord>,
}

impl VisitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register institution, replacing any previous one with the same id.
    pub fn add_institution(&mut self, institution: Institution) -> &mut Self {
        self.institutions.insert(institution.id(), institution);
        self
    }

    pub fn institution(&self, id: InstitutionId) -> Option<&Institution> {
        self.institutions.get(&id)
    }

    /// Store a visit.
    pub fn record(&mut self, visit: VisitRecord) -> &mut Self {
        if !self.institutions.is_empty() && !self.institutions.contains_key(&visit.institution()) {
            warn!(
                target: "stats",
                "visit {} references unknown institution {}",
                visit.id(),
                visit.institution()
            );
        }
        self.visits.push(visit);
        self
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

impl VisitSource for VisitLog {
    fn visits(&self, scope: &AccessScope) -> Vec<VisitRecord> {
        let mut out: Vec<VisitRecord> = self
            .visits
            .iter()
            .filter(|v| scope.permits(v.institution()))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.visited_at().cmp(&a.visited_at()));
        return out;
    }

    fn institution_name(&self, id: InstitutionId) -> Option<String> {
        self.institution(id).map(|inst| inst.name().clone())
    }
}

impl Extend<VisitRecord> for VisitLog {
    fn extend<I: IntoIterator<Item = VisitRecord>>(&mut self, iter: I) {
        for visit in iter {
            self.record(visit);
        }
    }
}

impl FromIterator<VisitRecord> for VisitLog {
    fn from_iter<I: IntoIterator<Item = VisitRecord>>(iter: I) -> Self {
        let mut log = VisitLog::new();
        log.extend(iter);
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstitutionType, SymptomCategory::*};
    use crate::stats::aggregator::tests::at;

    fn sample_log() -> VisitLog {
        let mut log = VisitLog::new();
        log.add_institution(Institution::new(1, "North clinic", InstitutionType::Clinic))
            .add_institution(Institution::new(2, "Central lab", InstitutionType::Laboratory));
        log.extend(vec![
            VisitRecord::new(1, at(2024, 1, 1, 9), 1).with_symptoms(vec![Flu]),
            VisitRecord::new(2, at(2024, 1, 2, 9), 2).with_symptoms(vec![Chickenpox, Flu]),
            VisitRecord::new(3, at(2024, 1, 2, 12), 1).with_symptoms(vec![MentalDifficulties]),
            VisitRecord::new(4, at(2024, 1, 3, 10), 2),
        ]);
        log
    }

    #[test]
    fn scope_for_user() {
        let admin = UserProfile::new("root", Role::Admin, None);
        let analyst = UserProfile::new("ana", Role::Analyst, Some(2));
        let doctor = UserProfile::new("doc", Role::Clinician, Some(1));
        let orphan = UserProfile::new("nobody", Role::Clinician, None);

        assert_eq!(AccessScope::for_user(&admin), Some(AccessScope::Global));
        assert_eq!(AccessScope::for_user(&analyst), Some(AccessScope::Global));
        assert_eq!(AccessScope::for_user(&doctor), Some(AccessScope::Institution(1)));
        assert_eq!(AccessScope::for_user(&orphan), None);
    }

    #[test]
    fn source_filters_and_orders_visits() {
        let log = sample_log();
        let ids: Vec<_> = log.visits(&AccessScope::Global).iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);

        let ids: Vec<_> = log
            .visits(&AccessScope::Institution(1))
            .iter()
            .map(|v| v.id())
            .collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(log.visits(&AccessScope::Institution(99)).is_empty());
    }

    #[test]
    fn statistics_are_scoped_by_source() {
        let log = sample_log();
        let global = statistics(&log, &AccessScope::Global);
        assert_eq!(global.daily_counts().len(), 3);
        assert_eq!(global.category_counts()[0].category, Flu);
        assert_eq!(global.category_counts()[0].count, 2);

        let own = statistics(&log, &AccessScope::Institution(2));
        let days: Vec<_> = own.daily_counts().iter().map(|c| c.count).collect();
        assert_eq!(days, vec![1, 1]);
        let cats: Vec<_> = own.category_counts().iter().map(|c| c.category).collect();
        assert_eq!(cats, vec![Chickenpox, Flu]);
    }

    #[test]
    fn statistics_for_user_without_institution() {
        let log = sample_log();
        let orphan = UserProfile::new("nobody", Role::Clinician, None);
        assert!(statistics_for_user(&log, &orphan).is_empty());

        let doctor = UserProfile::new("doc", Role::Clinician, Some(1));
        assert_eq!(
            statistics_for_user(&log, &doctor),
            statistics(&log, &AccessScope::Institution(1))
        );
    }

    #[test]
    fn institution_names() {
        let log = sample_log();
        assert_eq!(log.institution_name(2).as_deref(), Some("Central lab"));
        assert_eq!(log.institution_name(5), None);
        assert_eq!(AccessScope::Institution(7).to_string(), "institution #7");
    }
}
