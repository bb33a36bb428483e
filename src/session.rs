use crate::error::PrismError;
use crate::gateway::{GroupSubmission, SubmissionPayload, UploadedExperiment};
use crate::partition::PartitionManager;
use crate::sample::{Catalog, Sample};

/// One experiment's worth of application state: the immutable catalog from
/// the last upload plus the current partition. A new upload replaces the
/// session wholesale; group membership from a previous upload has no meaning
/// against a new catalog, so nothing carries over.
#[derive(Debug, Clone)]
pub struct ExperimentSession {
    name: String,
    catalog: Catalog,
    partition: PartitionManager,
}

impl ExperimentSession {
    pub fn from_upload(uploaded: UploadedExperiment) -> Self {
        let catalog = Catalog::from_samples(uploaded.samples);
        let partition = PartitionManager::new(catalog.names().iter().cloned());
        Self {
            name: uploaded.name,
            catalog,
            partition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn partition(&self) -> &PartitionManager {
        &self.partition
    }

    pub fn partition_mut(&mut self) -> &mut PartitionManager {
        &mut self.partition
    }

    /// Resolves the completed partition into full sample records, in
    /// partition order. Refused while any sample is still unassigned; that
    /// condition is reported to the user, never silently dropped.
    pub fn build_submission(&self) -> Result<SubmissionPayload, PrismError> {
        if !self.partition.is_complete() {
            return Err(PrismError::IncompletePartition {
                unassigned: self.partition.unassigned_count(),
            });
        }
        let mut samples = Vec::with_capacity(self.partition.groups().len());
        for group in self.partition.groups() {
            let control = self.resolve(group.control())?;
            let experimental = group
                .experimental()
                .iter()
                .map(|name| self.resolve(name))
                .collect::<Result<Vec<_>, _>>()?;
            samples.push(GroupSubmission {
                control,
                experimental,
            });
        }
        Ok(SubmissionPayload {
            name: self.name.clone(),
            samples,
        })
    }

    /// The partition only ever holds names it took from the catalog, so a
    /// failed lookup here is a bookkeeping bug, not bad user input.
    fn resolve(&self, name: &str) -> Result<Sample, PrismError> {
        self.catalog.get(name).cloned().ok_or_else(|| {
            PrismError::InternalConsistency(format!(
                "partition holds '{name}' but the catalog does not"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded() -> UploadedExperiment {
        UploadedExperiment {
            name: "plate_1".to_string(),
            samples: vec![
                Sample::new("A", vec![1.0, 2.0, 3.0]),
                Sample::new("B", vec![4.0, 5.0, 6.0]),
                Sample::new("C", vec![7.0, 8.0, 9.0]),
                Sample::new("D", vec![10.0, 11.0, 12.0]),
            ],
        }
    }

    #[test]
    fn test_session_pools_every_catalog_name() {
        let session = ExperimentSession::from_upload(uploaded());
        assert_eq!(session.name(), "plate_1");
        assert_eq!(session.partition().pooled_names(), ["A", "B", "C", "D"]);
        assert!(!session.partition().is_complete());
    }

    #[test]
    fn test_build_submission_requires_complete_partition() {
        let mut session = ExperimentSession::from_upload(uploaded());
        let group_a = session.partition_mut().create_group("A").unwrap();
        session.partition_mut().assign_sample(group_a, "B").unwrap();

        let err = session.build_submission().unwrap_err();
        assert_eq!(err, PrismError::IncompletePartition { unassigned: 2 });
    }

    #[test]
    fn test_build_submission_resolves_groups_in_partition_order() {
        let mut session = ExperimentSession::from_upload(uploaded());
        let group_a = session.partition_mut().create_group("A").unwrap();
        session.partition_mut().assign_sample(group_a, "B").unwrap();
        let group_c = session.partition_mut().create_group("C").unwrap();
        session.partition_mut().assign_sample(group_c, "D").unwrap();

        let payload = session.build_submission().unwrap();
        assert_eq!(payload.name, "plate_1");
        assert_eq!(payload.samples.len(), 2);
        assert_eq!(payload.samples[0].control, Sample::new("A", vec![1.0, 2.0, 3.0]));
        assert_eq!(
            payload.samples[0].experimental,
            vec![Sample::new("B", vec![4.0, 5.0, 6.0])]
        );
        assert_eq!(payload.samples[1].control.name, "C");
        assert_eq!(payload.samples[1].experimental[0].name, "D");
    }

    #[test]
    fn test_deleting_a_group_reopens_the_submission_gate() {
        let mut session = ExperimentSession::from_upload(uploaded());
        let group_a = session.partition_mut().create_group("A").unwrap();
        session.partition_mut().assign_sample(group_a, "B").unwrap();
        let group_c = session.partition_mut().create_group("C").unwrap();
        session.partition_mut().assign_sample(group_c, "D").unwrap();
        assert!(session.build_submission().is_ok());

        session.partition_mut().delete_group(group_a).unwrap();
        assert_eq!(session.partition().pooled_names(), ["A", "B"]);
        let err = session.build_submission().unwrap_err();
        assert_eq!(err, PrismError::IncompletePartition { unassigned: 2 });
    }

    #[test]
    fn test_unresolvable_name_is_an_internal_error() {
        let mut session = ExperimentSession::from_upload(uploaded());
        // Force the partition out of sync with the catalog; only a bug in
        // the partition bookkeeping could do this in normal operation.
        *session.partition_mut() = PartitionManager::new(vec!["ghost".to_string()]);
        session.partition_mut().create_group("ghost").unwrap();

        let err = session.build_submission().unwrap_err();
        assert!(matches!(err, PrismError::InternalConsistency(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_control_only_group_is_submittable() {
        let mut session = ExperimentSession::from_upload(UploadedExperiment {
            name: "solo".to_string(),
            samples: vec![Sample::new("only", vec![1.0])],
        });
        session.partition_mut().create_group("only").unwrap();

        let payload = session.build_submission().unwrap();
        assert_eq!(payload.samples.len(), 1);
        assert!(payload.samples[0].experimental.is_empty());
    }
}
