//! Translation of list-query validation failures into HTTP errors.

use serde_json::{Map, Value, json};

use crate::domain::{CountryQueryError, CountrySort, Error};

/// Build a 400 whose `details.fields` names every rejected parameter.
///
/// An unknown `sort` also lists the accepted values under `details.allowed`.
pub(crate) fn invalid_list_query(errors: &[CountryQueryError]) -> Error {
    let mut fields = Map::new();
    let mut unknown_sort = false;
    for error in errors {
        match error {
            CountryQueryError::Field(field) => {
                fields.insert(field.field().to_owned(), Value::String(field.to_string()));
            }
            CountryQueryError::Sort(sort) => {
                unknown_sort = true;
                fields.insert(
                    "sort".to_owned(),
                    Value::String(format!(
                        "unknown value {:?}; expected one of {}",
                        sort.value,
                        CountrySort::allowed()
                    )),
                );
            }
        }
    }

    let only_sort = unknown_sort && fields.len() == 1;
    let mut details = json!({ "fields": fields });
    if unknown_sort {
        details["allowed"] = CountrySort::ALL
            .iter()
            .map(|sort| Value::String(sort.as_str().to_owned()))
            .collect();
    }
    let message = if only_sort {
        "Invalid sort parameter"
    } else {
        "Validation failed"
    };
    Error::invalid_request(message).with_details(details)
}
