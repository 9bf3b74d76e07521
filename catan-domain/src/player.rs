use crate::{PlayerId, ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

pub fn normalize_player_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return ServiceError::bad_request("Player name must not be empty");
    }
    Ok(name.to_string())
}
