//! Record types mirroring the backend's response shapes

pub mod assessment;
pub mod auth;
pub mod common;
pub mod infirmary;
pub mod inventory;
pub mod member;
pub mod nurse;
pub mod school;

pub use assessment::{Assessment, AssessmentPayload, AssessmentQuery};
pub use auth::{AuthTokens, AuthUser, Credentials, LoginData};
pub use common::{PincodeLookup, PostOffice, RecordRef, UploadedMedia};
pub use infirmary::{
    InfirmaryPayload, InfirmaryQuery, InfirmaryRecord, MedicineProvided, MedicineRequest,
};
pub use inventory::{InventoryItem, InventoryPayload, InventoryQuery, StockStatus};
pub use member::{
    Address, EmergencyContact, GeoLocation, Member, MemberPayload, MemberQuery, StudentDetails,
};
pub use nurse::{Nurse, NursePayload, NurseQuery, NurseStats};
pub use school::{Grade, School, Section};
