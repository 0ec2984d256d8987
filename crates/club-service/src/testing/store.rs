//! In-memory repositories
//!
//! One mutex guards all tables so every repository call is a single critical
//! section, the same unit a database transaction gives the real backend.
//! The lock is never held across an await.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use club_core::achievements::plan_award;
use club_core::lifecycle::ensure_can_register;
use club_core::traits::{
    AchievementRepository, EventQuery, EventRepository, MemberRepository, PageQuery,
    PointsAdjustment, RegistrationRepository, RepoResult,
};
use club_core::{
    AchievementRecord, AwardOutcome, AwardTrigger, DomainError, Event, EventId, EventStatus,
    EventRegistration, Member, MemberId, MemberRole, MemberStatus, PhoneNumber, Points,
    ProfileChanges,
};
use parking_lot::Mutex;

struct StoredMember {
    member: Member,
    password_hash: String,
}

#[derive(Default)]
struct Tables {
    members: BTreeMap<MemberId, StoredMember>,
    /// In award order
    records: Vec<AchievementRecord>,
    events: BTreeMap<EventId, Event>,
    registrations: Vec<EventRegistration>,
}

impl Tables {
    fn held_titles(&self, member_id: MemberId) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.member_id == member_id)
            .map(|r| r.title.clone())
            .collect()
    }

    fn check_unique(&self, member: &Member) -> RepoResult<()> {
        for stored in self.members.values().filter(|s| s.member.id != member.id) {
            let other = &stored.member;
            if other.username.eq_ignore_ascii_case(&member.username) {
                return Err(DomainError::UsernameTaken);
            }
            if other.email.eq_ignore_ascii_case(&member.email) {
                return Err(DomainError::EmailTaken);
            }
            if other.phone == member.phone {
                return Err(DomainError::PhoneTaken);
            }
            if other.card_code == member.card_code {
                return Err(DomainError::CardCodeTaken);
            }
        }
        Ok(())
    }

    fn find_member(&self, predicate: impl Fn(&Member) -> bool) -> Option<Member> {
        self.members
            .values()
            .map(|s| &s.member)
            .find(|m| predicate(m))
            .cloned()
    }

    fn member_mut(&mut self, id: MemberId) -> RepoResult<&mut Member> {
        self.members
            .get_mut(&id)
            .map(|s| &mut s.member)
            .ok_or(DomainError::MemberNotFound(id))
    }

    /// Plan and apply a trigger while the caller holds the lock
    fn award(&mut self, id: MemberId, trigger: AwardTrigger) -> RepoResult<AwardOutcome> {
        let held = self.held_titles(id);
        let mut member = self.member_mut(id)?.clone();

        let plan = plan_award(trigger, &member, &held)?;
        if plan.is_empty() {
            return Ok(AwardOutcome {
                member,
                minted: Vec::new(),
                credited: Points::ZERO,
            });
        }

        let before = member.points;
        plan.apply_flags(&mut member);

        let mut minted = Vec::new();
        for definition in &plan.grants {
            if held.iter().any(|t| t == definition.title) {
                continue;
            }
            let record = AchievementRecord::mint(id, definition);
            member.record_achievement(&record);
            self.records.push(record.clone());
            minted.push(record);
        }

        *self.member_mut(id)? = member.clone();
        let credited = Points::new(member.points.value() - before.value());
        Ok(AwardOutcome {
            member,
            minted,
            credited,
        })
    }

    fn release_seat(&mut self, event_id: EventId) {
        if let Some(event) = self.events.get_mut(&event_id) {
            event.capacity.registered = (event.capacity.registered - 1).max(0);
        }
    }
}

fn page_len(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

/// Every repository over one shared set of tables
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member without going through the async repository surface
    pub fn seed(
        &self,
        member: Member,
        password_hash: String,
        records: Vec<AchievementRecord>,
    ) -> RepoResult<MemberId> {
        let mut tables = self.tables.lock();
        tables.check_unique(&member)?;
        let id = member.id;
        tables.members.insert(
            id,
            StoredMember {
                member,
                password_hash,
            },
        );
        tables.records.extend(records);
        Ok(id)
    }

    /// Titles a member holds, in award order
    pub fn titles(&self, member_id: MemberId) -> Vec<String> {
        self.tables.lock().held_titles(member_id)
    }

    pub fn points(&self, member_id: MemberId) -> Points {
        self.tables
            .lock()
            .members
            .get(&member_id)
            .map_or(Points::ZERO, |s| s.member.points)
    }

    pub fn member_count(&self) -> usize {
        self.tables.lock().members.len()
    }

    pub fn record_count(&self) -> usize {
        self.tables.lock().records.len()
    }

    pub fn record_count_for(&self, member_id: MemberId) -> usize {
        self.titles(member_id).len()
    }

    /// Change stored state directly, bypassing the award rules
    pub fn edit_member(&self, member_id: MemberId, edit: impl FnOnce(&mut Member)) {
        if let Some(stored) = self.tables.lock().members.get_mut(&member_id) {
            edit(&mut stored.member);
        }
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        Ok(self.tables.lock().members.get(&id).map(|s| s.member.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Member>> {
        Ok(self
            .tables
            .lock()
            .find_member(|m| m.username.eq_ignore_ascii_case(username)))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        Ok(self
            .tables
            .lock()
            .find_member(|m| m.email.eq_ignore_ascii_case(email)))
    }

    async fn find_by_card_code(&self, code: &str) -> RepoResult<Option<Member>> {
        Ok(self.tables.lock().find_member(|m| m.card_code == code))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn phone_exists(&self, phone: &PhoneNumber) -> RepoResult<bool> {
        Ok(self.tables.lock().find_member(|m| &m.phone == phone).is_some())
    }

    async fn list(&self, page: PageQuery<MemberId>) -> RepoResult<Vec<Member>> {
        let tables = self.tables.lock();
        Ok(tables
            .members
            .iter()
            .filter(|(id, _)| page.after.is_none_or(|after| **id > after))
            .take(page_len(page.limit))
            .map(|(_, s)| s.member.clone())
            .collect())
    }

    async fn create(
        &self,
        member: &Member,
        password_hash: &str,
        achievements: &[AchievementRecord],
    ) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        tables.check_unique(member)?;
        for (i, record) in achievements.iter().enumerate() {
            if achievements[..i].iter().any(|r| r.title == record.title) {
                return Err(DomainError::DuplicateAchievement(record.title.clone()));
            }
        }

        tables.members.insert(
            member.id,
            StoredMember {
                member: member.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        tables.records.extend_from_slice(achievements);
        Ok(())
    }

    async fn update_profile(
        &self,
        id: MemberId,
        changes: &ProfileChanges,
    ) -> RepoResult<AwardOutcome> {
        let mut tables = self.tables.lock();
        let member = tables.member_mut(id)?;
        let mut profile = member.profile.clone();
        changes.apply(&mut profile)?;
        member.profile = profile;
        member.touch();
        tables.award(id, AwardTrigger::ProfileUpdated)
    }

    async fn set_role_status(
        &self,
        id: MemberId,
        role: Option<MemberRole>,
        status: Option<MemberStatus>,
    ) -> RepoResult<Member> {
        let mut tables = self.tables.lock();
        let member = tables.member_mut(id)?;
        if let Some(role) = role {
            member.role = role;
        }
        if let Some(status) = status {
            member.status = status;
        }
        member.touch();
        Ok(member.clone())
    }

    async fn set_card_code(&self, id: MemberId, code: &str) -> RepoResult<Member> {
        let mut tables = self.tables.lock();
        if tables
            .members
            .values()
            .any(|s| s.member.id != id && s.member.card_code == code)
        {
            return Err(DomainError::CardCodeTaken);
        }
        let member = tables.member_mut(id)?;
        member.card_code = code.to_string();
        member.touch();
        Ok(member.clone())
    }

    async fn delete(&self, id: MemberId) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        if tables.members.remove(&id).is_none() {
            return Err(DomainError::MemberNotFound(id));
        }
        tables.records.retain(|r| r.member_id != id);

        let released: Vec<EventId> = tables
            .registrations
            .iter()
            .filter(|r| r.member_id == id)
            .map(|r| r.event_id)
            .collect();
        tables.registrations.retain(|r| r.member_id != id);
        for event_id in released {
            tables.release_seat(event_id);
        }
        Ok(())
    }

    async fn get_password_hash(&self, id: MemberId) -> RepoResult<Option<String>> {
        Ok(self
            .tables
            .lock()
            .members
            .get(&id)
            .map(|s| s.password_hash.clone()))
    }

    async fn apply_award(&self, id: MemberId, trigger: AwardTrigger) -> RepoResult<AwardOutcome> {
        self.tables.lock().award(id, trigger)
    }

    async fn adjust_points(&self, id: MemberId, delta: i64) -> RepoResult<PointsAdjustment> {
        let mut tables = self.tables.lock();
        let member = tables.member_mut(id)?;
        let previous = member.points;
        member.points = previous.adjusted(delta);
        member.touch();
        Ok(PointsAdjustment {
            member: member.clone(),
            previous,
        })
    }
}

#[async_trait]
impl AchievementRepository for InMemoryStore {
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<AchievementRecord>> {
        Ok(self
            .tables
            .lock()
            .records
            .iter()
            .filter(|r| r.member_id == member_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>> {
        Ok(self.tables.lock().events.get(&id).cloned())
    }

    async fn list(&self, query: EventQuery) -> RepoResult<Vec<Event>> {
        let tables = self.tables.lock();
        Ok(tables
            .events
            .values()
            .filter(|e| query.include_drafts || e.status != EventStatus::Draft)
            .filter(|e| query.page.after.is_none_or(|after| e.id > after))
            .take(page_len(query.page.limit))
            .cloned()
            .collect())
    }

    async fn create(&self, event: &Event) -> RepoResult<()> {
        self.tables.lock().events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update(&self, event: &Event) -> RepoResult<Event> {
        let mut tables = self.tables.lock();
        let stored = tables
            .events
            .get_mut(&event.id)
            .ok_or(DomainError::EventNotFound(event.id))?;

        let registered = stored.capacity.registered;
        if event
            .capacity
            .max_participants
            .is_some_and(|max| max < registered)
        {
            return Err(DomainError::invalid_field(
                "max_participants",
                "Capacity cannot be lower than existing registrations",
            ));
        }
        let status = stored.status;
        *stored = event.clone();
        stored.status = status;
        stored.capacity.registered = registered;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn set_status(&self, id: EventId, from: EventStatus, to: EventStatus) -> RepoResult<Event> {
        let mut tables = self.tables.lock();
        let stored = tables
            .events
            .get_mut(&id)
            .ok_or(DomainError::EventNotFound(id))?;
        if stored.status != from {
            return Err(DomainError::InvalidStatusTransition {
                from: stored.status,
                to,
            });
        }
        stored.transition_to(to)?;
        Ok(stored.clone())
    }

    async fn delete(&self, id: EventId) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        if tables.events.remove(&id).is_none() {
            return Err(DomainError::EventNotFound(id));
        }
        tables.registrations.retain(|r| r.event_id != id);
        Ok(())
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn register(
        &self,
        event_id: EventId,
        member: &Member,
        now: DateTime<Utc>,
    ) -> RepoResult<EventRegistration> {
        let mut tables = self.tables.lock();
        let already = tables
            .registrations
            .iter()
            .any(|r| r.event_id == event_id && r.member_id == member.id);

        let event = tables
            .events
            .get_mut(&event_id)
            .ok_or(DomainError::EventNotFound(event_id))?;
        if already {
            return Err(DomainError::AlreadyRegistered);
        }
        ensure_can_register(member, event, now)?;
        event.capacity.registered += 1;

        let registration = EventRegistration::new(event_id, member.id);
        tables.registrations.push(registration.clone());
        Ok(registration)
    }

    async fn cancel(&self, event_id: EventId, member_id: MemberId) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        let before = tables.registrations.len();
        tables
            .registrations
            .retain(|r| !(r.event_id == event_id && r.member_id == member_id));
        if tables.registrations.len() == before {
            return Err(DomainError::RegistrationNotFound);
        }
        tables.release_seat(event_id);
        Ok(())
    }

    async fn find(
        &self,
        event_id: EventId,
        member_id: MemberId,
    ) -> RepoResult<Option<EventRegistration>> {
        Ok(self
            .tables
            .lock()
            .registrations
            .iter()
            .find(|r| r.event_id == event_id && r.member_id == member_id)
            .cloned())
    }

    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<EventRegistration>> {
        Ok(self
            .tables
            .lock()
            .registrations
            .iter()
            .filter(|r| r.member_id == member_id)
            .cloned()
            .collect())
    }
}
