use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{AuthApi, BloodRequestApi, DonorApi, StaffApi};
use crate::error::ApiError;
use crate::models::{
    BackendUser, BloodRequest, BloodRequestRecord, Credentials, DonorForm, DonorId, DonorRecord,
    DonorSignUp, Role, SignInResponse, StaffAccount,
};

/// Operations whose next calls can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    SignIn,
    SignUp,
    ListDonors,
    CreateDonor,
    UpdateDonor,
    DeleteDonor,
    SubmitRequest,
    ListRequests,
    AddStaff,
}

#[derive(Default)]
struct MockState {
    donors: Vec<DonorRecord>,
    next_id: DonorId,
    requests: Vec<BloodRequestRecord>,
    staff: Vec<StaffAccount>,
    accounts: Vec<(Role, String, String, BackendUser)>,
    failing: HashMap<MockOp, ApiError>,
    calls: HashMap<MockOp, usize>,
}

/// In-memory backend honouring the same contracts as the REST API.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_donors(donors: Vec<DonorRecord>) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.lock();
            state.next_id = donors.iter().map(|d| d.id).max().unwrap_or(0);
            state.donors = donors;
        }
        backend
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // a poisoned mock means an earlier test assertion already panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_account(&self, role: Role, email: &str, password: &str, user: BackendUser) {
        self.lock()
            .accounts
            .push((role, email.to_string(), password.to_string(), user));
    }

    pub fn add_request(&self, request: BloodRequestRecord) {
        self.lock().requests.push(request);
    }

    /// The next call of `op` fails with `error`; later calls succeed again.
    pub fn fail_next(&self, op: MockOp, error: ApiError) {
        self.lock().failing.insert(op, error);
    }

    pub fn donors(&self) -> Vec<DonorRecord> {
        self.lock().donors.clone()
    }

    pub fn staff(&self) -> Vec<StaffAccount> {
        self.lock().staff.clone()
    }

    pub fn requests(&self) -> Vec<BloodRequestRecord> {
        self.lock().requests.clone()
    }

    pub fn calls(&self, op: MockOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    fn enter(&self, op: MockOp) -> Result<MutexGuard<'_, MockState>, ApiError> {
        let mut state = self.lock();
        *state.calls.entry(op).or_default() += 1;
        match state.failing.remove(&op) {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Backend {
        status: StatusCode::NOT_FOUND,
        message: Some(format!("{} not found", what)),
    }
}

fn apply(record: &mut DonorRecord, form: &DonorForm) {
    if let Some(v) = &form.full_name {
        record.full_name = v.clone();
    }
    if let Some(v) = form.age {
        record.age = v;
    }
    if let Some(v) = &form.gender {
        record.gender = v.clone();
    }
    if let Some(v) = &form.blood_group {
        record.blood_group = v.clone();
    }
    if let Some(v) = &form.email {
        record.email = v.clone();
    }
    if let Some(v) = &form.phone {
        record.phone = v.clone();
    }
    if let Some(v) = &form.location {
        record.location = v.clone();
    }
}

#[async_trait]
impl AuthApi for MockBackend {
    async fn sign_in(
        &self,
        role: Role,
        credentials: &Credentials,
    ) -> Result<SignInResponse, ApiError> {
        let state = self.enter(MockOp::SignIn)?;
        state
            .accounts
            .iter()
            .find(|(r, email, password, _)| {
                *r == role && *email == credentials.email && *password == credentials.password
            })
            .map(|(r, email, _, user)| SignInResponse {
                token: format!("mock-{}-{}", r.selector_value(), email),
                user: Some(user.clone()),
            })
            .ok_or(ApiError::Backend {
                status: StatusCode::UNAUTHORIZED,
                message: Some("Invalid credentials".to_string()),
            })
    }

    async fn sign_up(&self, donor: &DonorSignUp) -> Result<(), ApiError> {
        let mut state = self.enter(MockOp::SignUp)?;
        if state.donors.iter().any(|d| d.email == donor.email) {
            return Err(ApiError::Backend {
                status: StatusCode::CONFLICT,
                message: Some("Email already registered".to_string()),
            });
        }
        state.next_id += 1;
        let id = state.next_id;
        state.donors.push(DonorRecord {
            id,
            full_name: donor.full_name.clone(),
            age: donor.age,
            gender: donor.gender.clone(),
            blood_group: donor.blood_group.clone(),
            email: donor.email.clone(),
            phone: donor.phone.clone(),
            location: donor.location.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl DonorApi for MockBackend {
    async fn list_donors(&self) -> Result<Vec<DonorRecord>, ApiError> {
        let state = self.enter(MockOp::ListDonors)?;
        Ok(state.donors.clone())
    }

    async fn create_donor(&self, form: &DonorForm) -> Result<(), ApiError> {
        let mut state = self.enter(MockOp::CreateDonor)?;
        state.next_id += 1;
        let mut record = DonorRecord {
            id: state.next_id,
            full_name: String::new(),
            age: 0,
            gender: String::new(),
            blood_group: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
        };
        apply(&mut record, form);
        state.donors.push(record);
        Ok(())
    }

    async fn update_donor(&self, id: DonorId, form: &DonorForm) -> Result<(), ApiError> {
        let mut state = self.enter(MockOp::UpdateDonor)?;
        let record = state
            .donors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found("Donor"))?;
        apply(record, form);
        Ok(())
    }

    async fn delete_donor(&self, id: DonorId) -> Result<(), ApiError> {
        let mut state = self.enter(MockOp::DeleteDonor)?;
        let before = state.donors.len();
        state.donors.retain(|d| d.id != id);
        if state.donors.len() == before {
            return Err(not_found("Donor"));
        }
        Ok(())
    }
}

#[async_trait]
impl BloodRequestApi for MockBackend {
    async fn submit_request(&self, request: &BloodRequest) -> Result<(), ApiError> {
        let mut state = self.enter(MockOp::SubmitRequest)?;
        let id = state.requests.len() as i64 + 1;
        state.requests.push(BloodRequestRecord {
            id,
            blood_group: request.blood_group.clone(),
            units: request.units,
            hospital: request.hospital.clone(),
            date: request.date.clone(),
            notes: Some(request.notes.clone()),
            donor_email: Some(request.donor_email.clone()),
        });
        Ok(())
    }

    async fn list_requests(&self) -> Result<Vec<BloodRequestRecord>, ApiError> {
        let state = self.enter(MockOp::ListRequests)?;
        Ok(state.requests.clone())
    }
}

#[async_trait]
impl StaffApi for MockBackend {
    async fn add_staff(&self, staff: &StaffAccount) -> Result<String, ApiError> {
        let mut state = self.enter(MockOp::AddStaff)?;
        state.staff.push(staff.clone());
        Ok(format!("Staff {} added", staff.name))
    }
}
