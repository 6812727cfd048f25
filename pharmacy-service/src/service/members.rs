use tracing::{info, warn};

use super::dto::{CreateMember, MemberDto, UpdateMember};
use super::{PharmacyService, member_key};
use crate::db::{Member, NewMember};
use crate::error::{ServiceError, ServiceResult};
use crate::search::{MemberCriteria, ResultPage, advanced_search};

fn not_found(member: impl ToString) -> ServiceError {
    ServiceError::MemberNotFound {
        member: member.to_string(),
    }
}

impl PharmacyService {
    pub async fn list_members(&self) -> ServiceResult<Vec<MemberDto>> {
        Ok(self
            .db
            .list_members()?
            .into_iter()
            .map(MemberDto::from)
            .collect())
    }

    /// Get a member by id, reading through the cache
    pub async fn get_member(&self, id: i64) -> ServiceResult<MemberDto> {
        let key = member_key(id);
        if let Some(member) = self.cached::<Member>(&key).await {
            return Ok(member.into());
        }

        let member = self.db.get_member(id)?.ok_or_else(|| not_found(id))?;
        self.cache_fresh(&key, &member, || self.db.get_member(id)).await?;
        Ok(member.into())
    }

    pub async fn get_member_by_number(&self, member_number: &str) -> ServiceResult<MemberDto> {
        self.db
            .get_member_by_number(member_number)?
            .map(MemberDto::from)
            .ok_or_else(|| not_found(member_number))
    }

    pub async fn members_by_gender(&self, gender: &str) -> ServiceResult<Vec<MemberDto>> {
        Ok(self
            .db
            .list_members_by_gender(gender.trim())?
            .into_iter()
            .map(MemberDto::from)
            .collect())
    }

    /// Free-text search across name, member number and email
    pub async fn search_members(&self, term: &str) -> ServiceResult<Vec<MemberDto>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::invalid_request("Search term is required."));
        }

        Ok(self
            .db
            .search_members(term)?
            .into_iter()
            .map(MemberDto::from)
            .collect())
    }

    pub async fn advanced_search_members(
        &self,
        criteria: &MemberCriteria,
    ) -> ServiceResult<ResultPage<MemberDto>> {
        let page = advanced_search::<Member>(
            &self.db,
            criteria,
            self.search.default_page_size,
            Self::today(),
        )?;
        Ok(page.map(MemberDto::from))
    }

    pub async fn create_member(&self, request: CreateMember) -> ServiceResult<MemberDto> {
        if self.db.member_number_exists(&request.member_number)? {
            return Err(ServiceError::conflict(format!(
                "Member number '{}' already exists.",
                request.member_number
            )));
        }

        let new_member = NewMember::from(request);
        let id = self.db.insert_member(&new_member)?;
        info!(id, member_number = %new_member.member_number, "Created member");

        let member = self
            .db
            .get_member(id)?
            .ok_or_else(|| ServiceError::Internal {
                message: format!("Member {} vanished after insert", id),
            })?;
        Ok(member.into())
    }

    /// Replace a member's details. The member number is kept.
    pub async fn update_member(&self, id: i64, request: UpdateMember) -> ServiceResult<MemberDto> {
        let mut member = self.db.get_member(id)?.ok_or_else(|| not_found(id))?;
        request.apply(&mut member);

        if !self.db.update_member(&member)? {
            return Err(not_found(id));
        }
        info!(id, "Updated member");

        self.cache_store(&member_key(id), &member).await;
        Ok(member.into())
    }

    pub async fn delete_member(&self, id: i64) -> ServiceResult<()> {
        if !self.db.delete_member(id)? {
            warn!(id, "Delete requested for unknown member");
            return Err(not_found(id));
        }
        info!(id, "Deleted member");

        self.cache_evict(&member_key(id)).await;
        Ok(())
    }

    pub async fn member_number_exists(&self, member_number: &str) -> ServiceResult<bool> {
        self.db.member_number_exists(member_number)
    }
}
