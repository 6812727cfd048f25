//! Demonstration members for local development.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::PharmacyService;
use super::dto::MemberDto;
use crate::db::NewMember;
use crate::error::{ServiceError, ServiceResult, format_error_chain};

/// Member-number prefixes that mark sample records
const SAMPLE_PREFIXES: [&str; 2] = ["MEM", "KUMAR"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDataSummary {
    pub message: String,
    pub members: Vec<MemberDto>,
    pub total_count: usize,
}

struct SampleMember {
    number: &'static str,
    first: &'static str,
    last: &'static str,
    dob: (i32, u32, u32),
    gender: &'static str,
    address: &'static str,
    phone: &'static str,
    email: &'static str,
}

const SAMPLE_MEMBERS: [SampleMember; 6] = [
    SampleMember {
        number: "MEM001",
        first: "John",
        last: "Doe",
        dob: (1985, 5, 15),
        gender: "Male",
        address: "123 Main Street, New York, NY 10001",
        phone: "555-0101",
        email: "john.doe@email.com",
    },
    SampleMember {
        number: "MEM002",
        first: "Jane",
        last: "Smith",
        dob: (1990, 8, 22),
        gender: "Female",
        address: "456 Oak Avenue, Los Angeles, CA 90210",
        phone: "555-0102",
        email: "jane.smith@email.com",
    },
    SampleMember {
        number: "MEM003",
        first: "Michael",
        last: "Johnson",
        dob: (1982, 12, 10),
        gender: "Male",
        address: "789 Pine Street, Chicago, IL 60601",
        phone: "555-0103",
        email: "michael.johnson@email.com",
    },
    SampleMember {
        number: "MEM004",
        first: "Emily",
        last: "Davis",
        dob: (1995, 3, 8),
        gender: "Female",
        address: "321 Elm Drive, Houston, TX 77001",
        phone: "555-0104",
        email: "emily.davis@email.com",
    },
    SampleMember {
        number: "MEM005",
        first: "David",
        last: "Wilson",
        dob: (1988, 7, 25),
        gender: "Male",
        address: "654 Maple Road, Phoenix, AZ 85001",
        phone: "555-0105",
        email: "david.wilson@email.com",
    },
    SampleMember {
        number: "KUMAR001",
        first: "Rajesh",
        last: "Kumar",
        dob: (1985, 3, 15),
        gender: "Male",
        address: "123 Kumar Street, Delhi, India",
        phone: "555-0106",
        email: "rajesh.kumar@email.com",
    },
];

impl SampleMember {
    fn to_new_member(&self) -> ServiceResult<NewMember> {
        let (year, month, day) = self.dob;
        let dob = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ServiceError::Internal {
            message: format!("Invalid sample birth date for {}", self.number),
        })?;

        Ok(NewMember {
            member_number: self.number.to_string(),
            first_name: self.first.to_string(),
            last_name: self.last.to_string(),
            dob,
            gender: self.gender.to_string(),
            address: self.address.to_string(),
            phone: self.phone.to_string(),
            email: self.email.to_string(),
        })
    }
}

impl PharmacyService {
    /// Insert any sample members that are not already present. Existing ones
    /// are reported as-is; a member that fails to insert is logged and skipped.
    pub async fn create_sample_members(&self) -> ServiceResult<SampleDataSummary> {
        let mut members = Vec::with_capacity(SAMPLE_MEMBERS.len());

        for sample in &SAMPLE_MEMBERS {
            if let Some(existing) = self.db.get_member_by_number(sample.number)? {
                info!(member_number = sample.number, "Sample member already exists");
                members.push(MemberDto::from(existing));
                continue;
            }

            let inserted = sample
                .to_new_member()
                .and_then(|new_member| self.db.insert_member(&new_member))
                .and_then(|id| self.db.get_member(id));
            match inserted {
                Ok(Some(member)) => {
                    info!(member_number = sample.number, "Created sample member");
                    members.push(member.into());
                }
                Ok(None) => {
                    warn!(member_number = sample.number, "Sample member missing after insert");
                }
                Err(e) => {
                    warn!(
                        member_number = sample.number,
                        error = %format_error_chain(&e),
                        "Failed to create sample member"
                    );
                }
            }
        }

        Ok(SampleDataSummary {
            message: format!(
                "Test data creation completed. {} members available.",
                members.len()
            ),
            total_count: members.len(),
            members,
        })
    }

    pub async fn member_count(&self) -> ServiceResult<u64> {
        self.db.count_members()
    }

    /// Delete every sample member and return how many were removed
    pub async fn clear_sample_members(&self) -> ServiceResult<usize> {
        let mut removed = 0;
        for member in self.db.list_members()? {
            if !SAMPLE_PREFIXES
                .iter()
                .any(|prefix| member.member_number.starts_with(prefix))
            {
                continue;
            }
            if self.db.delete_member(member.id)? {
                self.cache_evict(&super::member_key(member.id)).await;
                removed += 1;
            }
        }

        info!(removed, "Cleared sample members");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::db::Database;
    use std::sync::Arc;

    fn service() -> PharmacyService {
        PharmacyService::new(
            Arc::new(Database::open_in_memory().unwrap()),
            None,
            SearchConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_sample_members_are_idempotent() {
        let service = service();

        let first = service.create_sample_members().await.unwrap();
        assert_eq!(first.total_count, 6);
        assert_eq!(service.member_count().await.unwrap(), 6);

        let second = service.create_sample_members().await.unwrap();
        assert_eq!(second.total_count, 6);
        assert_eq!(service.member_count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_clear_keeps_other_members() {
        let service = service();
        service.create_sample_members().await.unwrap();
        service
            .db
            .insert_member(&NewMember {
                member_number: "PAT-77".to_string(),
                first_name: "Ana".to_string(),
                last_name: "Lopez".to_string(),
                dob: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
                gender: "Female".to_string(),
                address: String::new(),
                phone: String::new(),
                email: String::new(),
            })
            .unwrap();

        assert_eq!(service.clear_sample_members().await.unwrap(), 6);
        assert_eq!(service.member_count().await.unwrap(), 1);
    }
}
