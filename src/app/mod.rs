//! Application use cases.

mod person;

pub use person::{
    person_insert, person_list, Person, PersonIter, PersonList, DEFAULT_PAGE_SIZE,
};
