use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FreeTablesQuery {
    /// Party size
    #[validate(range(min = 1))]
    pub guests: i32,
    pub date: NaiveDate,
    /// Time label ("1:00 PM") or 24-hour value ("13:00:00")
    #[validate(length(min = 1))]
    pub time: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FreeDatesQuery {
    /// Party size
    #[validate(range(min = 1))]
    pub guests: i32,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FreeTimesQuery {
    /// Party size
    #[validate(range(min = 1))]
    pub guests: i32,
    pub date: NaiveDate,
}
