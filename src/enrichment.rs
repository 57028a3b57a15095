//! Facts derived from birth dates. Nothing here reads the clock: every
//! function takes the reference date it should use.

use crate::date::{BirthDate, ReferenceDate};
use crate::student::{EnrichedStudent, Student, UpcomingBirthday};

/// Completed years between `birth` and `reference`.
///
/// The count goes up on the birthday itself. Births after `reference`
/// are not checked and give a negative age.
pub fn age(birth: BirthDate, reference: ReferenceDate) -> i32 {
    let years = reference.year() - birth.year();

    if reference.month_day() < birth.month_day() {
        years - 1
    } else {
        years
    }
}

/// Whether `birth` falls in `month`. The month is not range checked.
pub fn in_month(birth: BirthDate, month: u8) -> bool {
    birth.month() == month
}

/// The first celebration of `birth` on or after `reference`.
///
/// Returns `None` if that would be past the last representable year.
pub fn next_birthday(birth: BirthDate, reference: ReferenceDate) -> Option<BirthDate> {
    let this_year = birth.occurrence_in(reference.year())?;

    if this_year < reference {
        birth.occurrence_in(reference.year() + 1)
    } else {
        Some(this_year)
    }
}

pub fn enrich(student: Student, reference: ReferenceDate) -> EnrichedStudent {
    let age = age(student.birth_date(), reference);

    EnrichedStudent { student, age }
}

pub fn enrich_all(
    students: impl IntoIterator<Item = Student>,
    reference: ReferenceDate,
) -> Vec<EnrichedStudent> {
    students
        .into_iter()
        .map(|student| enrich(student, reference))
        .collect()
}

/// Students born in `month`, in their original order.
pub fn born_in(
    students: impl IntoIterator<Item = Student>,
    month: u8,
    reference: ReferenceDate,
) -> Vec<EnrichedStudent> {
    enrich_all(
        students
            .into_iter()
            .filter(|student| in_month(student.birth_date(), month)),
        reference,
    )
}

/// Students whose next birthday is at most `window_days` after
/// `reference`, soonest first.
///
/// Students with the same birthday keep their relative order.
pub fn upcoming(
    students: impl IntoIterator<Item = Student>,
    reference: ReferenceDate,
    window_days: u32,
) -> Vec<UpcomingBirthday> {
    let mut upcoming = students
        .into_iter()
        .filter_map(|student| {
            let birth = student.birth_date();
            let next_birthday = next_birthday(birth, reference)?;
            let days_until_birthday = reference.days_until(next_birthday);

            if !(0..=i64::from(window_days)).contains(&days_until_birthday) {
                return None;
            }

            let age = age(birth, reference);

            Some(UpcomingBirthday {
                student,
                age,
                next_birthday,
                days_until_birthday,
                will_turn: age + 1,
            })
        })
        .collect::<Vec<_>>();

    // `sort_by_key` is stable
    upcoming.sort_by_key(|birthday| birthday.days_until_birthday);

    upcoming
}
