pub type ItemId = i64;

/// One row of a location search: item name plus the sector its location
/// points at. `setor` is `None` for items that were never assigned a location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationHit {
    pub nome: String,
    pub setor: Option<i64>,
}

impl LocationHit {
    pub fn new(nome: impl Into<String>, setor: i64) -> Self {
        Self { nome: nome.into(), setor: Some(setor) }
    }
}
