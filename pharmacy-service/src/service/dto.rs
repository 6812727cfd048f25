//! External representations of members and providers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{Member, NewMember, NewProvider, Provider};
use crate::validation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub id: i64,
    pub member_number: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl From<Member> for MemberDto {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            member_number: member.member_number,
            first_name: member.first_name,
            last_name: member.last_name,
            dob: member.dob,
            gender: member.gender,
            address: member.address,
            phone: member.phone,
            email: member.email,
        }
    }
}

/// Request body for creating a member
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMember {
    #[validate(length(min = 1, max = 50), custom(function = "validation::identifier"))]
    pub member_number: String,

    #[validate(length(min = 1, max = 100), custom(function = "validation::person_name"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100), custom(function = "validation::person_name"))]
    pub last_name: String,

    #[serde(alias = "DOB")]
    pub dob: NaiveDate,

    #[validate(custom(function = "validation::required_gender"))]
    pub gender: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,

    #[serde(default)]
    #[validate(length(max = 20), custom(function = "validation::phone"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 100), custom(function = "validation::email"))]
    pub email: String,
}

impl From<CreateMember> for NewMember {
    fn from(request: CreateMember) -> Self {
        Self {
            member_number: request.member_number,
            first_name: request.first_name,
            last_name: request.last_name,
            dob: request.dob,
            gender: request.gender,
            address: request.address,
            phone: request.phone,
            email: request.email,
        }
    }
}

/// Request body for updating a member. The member number cannot change.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMember {
    #[validate(length(min = 1, max = 100), custom(function = "validation::person_name"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100), custom(function = "validation::person_name"))]
    pub last_name: String,

    #[serde(alias = "DOB")]
    pub dob: NaiveDate,

    #[validate(custom(function = "validation::required_gender"))]
    pub gender: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,

    #[serde(default)]
    #[validate(length(max = 20), custom(function = "validation::phone"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 100), custom(function = "validation::email"))]
    pub email: String,
}

impl UpdateMember {
    pub(crate) fn apply(self, member: &mut Member) {
        member.first_name = self.first_name;
        member.last_name = self.last_name;
        member.dob = self.dob;
        member.gender = self.gender;
        member.address = self.address;
        member.phone = self.phone;
        member.email = self.email;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDto {
    pub id: i64,
    pub provider_number: String,
    pub name: String,
    pub npi: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub specialty: String,
}

impl From<Provider> for ProviderDto {
    fn from(provider: Provider) -> Self {
        Self {
            id: provider.id,
            provider_number: provider.provider_number,
            name: provider.name,
            npi: provider.npi,
            address: provider.address,
            phone: provider.phone,
            email: provider.email,
            specialty: provider.specialty,
        }
    }
}

/// Request body for registering a provider
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvider {
    #[validate(length(min = 1, max = 50), custom(function = "validation::identifier"))]
    pub provider_number: String,

    #[validate(length(min = 1, max = 200), custom(function = "validation::title_text"))]
    pub name: String,

    #[serde(alias = "NPI")]
    #[validate(custom(function = "validation::npi"))]
    pub npi: String,

    #[validate(length(min = 1, max = 500))]
    pub address: String,

    #[validate(length(min = 1, max = 20), custom(function = "validation::phone"))]
    pub phone: String,

    #[validate(length(min = 1, max = 100), custom(function = "validation::email"))]
    pub email: String,

    #[validate(length(min = 1, max = 100), custom(function = "validation::title_text"))]
    pub specialty: String,
}

impl From<CreateProvider> for NewProvider {
    fn from(request: CreateProvider) -> Self {
        Self {
            provider_number: request.provider_number,
            name: request.name,
            npi: request.npi,
            address: request.address,
            phone: request.phone,
            email: request.email,
            specialty: request.specialty,
        }
    }
}

/// Request body for updating a provider. The provider number cannot change.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProvider {
    #[validate(length(min = 1, max = 200), custom(function = "validation::title_text"))]
    pub name: String,

    #[serde(alias = "NPI")]
    #[validate(custom(function = "validation::npi"))]
    pub npi: String,

    #[validate(length(min = 1, max = 500))]
    pub address: String,

    #[validate(length(min = 1, max = 20), custom(function = "validation::phone"))]
    pub phone: String,

    #[validate(length(min = 1, max = 100), custom(function = "validation::email"))]
    pub email: String,

    #[validate(length(min = 1, max = 100), custom(function = "validation::title_text"))]
    pub specialty: String,
}

impl UpdateProvider {
    pub(crate) fn apply(self, provider: &mut Provider) {
        provider.name = self.name;
        provider.npi = self.npi;
        provider.address = self.address;
        provider.phone = self.phone;
        provider.email = self.email;
        provider.specialty = self.specialty;
    }
}
