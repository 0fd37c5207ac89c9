use super::import_row::GuardianColumn;
use super::person::PersonRecord;
use super::phone_number::{PhoneNumberKind, PhoneNumberRecord};
use super::student::StudentLink;
use super::tag::Tag;

/// Everything one accepted row will create
#[derive(Debug, Clone, PartialEq)]
pub struct GuardianCandidate {
    pub row_index: usize,
    pub person: PersonRecord,
    pub phone_numbers: Vec<PhoneNumberRecord>,
    pub student_links: Vec<StudentLink>,
    pub tags: Vec<Tag>,
}

impl GuardianCandidate {
    /// Move every owned record onto a new durable id
    pub fn reassign_id(&mut self, id: uuid::Uuid) {
        self.person.id = id;
        for phone in &mut self.phone_numbers {
            phone.owner_id = id;
        }
    }

    /// Every number the row carries with the column it came from, in column
    /// order. Legacy, primary and secondary numbers share one key space.
    pub fn phone_keys(&self) -> Vec<(GuardianColumn, &str)> {
        let legacy = self
            .person
            .phone_number
            .as_str()
            .map(|number| (GuardianColumn::PhoneNumber, number));

        legacy
            .into_iter()
            .chain(self.phone_numbers.iter().map(|phone| {
                let column = match phone.kind {
                    PhoneNumberKind::Primary => GuardianColumn::PrimaryPhoneNumber,
                    PhoneNumberKind::Secondary => GuardianColumn::SecondaryPhoneNumber,
                };
                (column, phone.number.as_str())
            }))
            .collect()
    }
}
