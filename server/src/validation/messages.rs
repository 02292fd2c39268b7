//! Localized validation messages.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fi,
    Sv,
}

impl Language {
    /// Picks the first supported language from an `Accept-Language` header.
    /// Quality weights are ignored; clients list preferences in order.
    pub fn from_accept_language(header: Option<&str>) -> Self {
        header
            .into_iter()
            .flat_map(|h| h.split(','))
            .filter_map(|entry| entry.split(';').next())
            .filter_map(|tag| tag.trim().split('-').next())
            .find_map(|primary| Self::from_code(&primary.to_ascii_lowercase()))
            .unwrap_or_default()
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "fi" => Some(Language::Fi),
            "sv" => Some(Language::Sv),
            _ => None,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Language
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        Ok(Language::from_accept_language(header))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Required,
    NotNull,
    ServerAssigned,
    InvalidJson,
    ExpectedObject,
    ExpectedList,
    ExpectedLocalizedText,
    InvalidDateTime,
    InvalidChoice,
    StartTimeInPast,
    EndTimeInPast,
    EndBeforeStart,
    ExpectedLinkedObject,
    MissingLinkedId,
    EmptyLinkedId,
    InvalidHyperlink,
    WrongResourceType,
    ObjectDoesNotExist,
    InvalidPage,
}

impl Message {
    pub fn text(self, language: Language) -> &'static str {
        use Language::*;
        use Message::*;

        match (self, language) {
            (Required, En) => "This field is required.",
            (Required, Fi) => "Tämä kenttä vaaditaan.",
            (Required, Sv) => "Detta fält är obligatoriskt.",

            (NotNull, En) => "This field may not be null.",
            (NotNull, Fi) => "Tämän kentän arvo ei voi olla tyhjä.",
            (NotNull, Sv) => "Detta fält får inte vara tomt.",

            (ServerAssigned, En) => "This field is assigned by the server and may not be set.",
            (ServerAssigned, Fi) => "Palvelin asettaa tämän kentän, eikä sitä voi asettaa.",
            (ServerAssigned, Sv) => "Servern tilldelar detta fält och det får inte anges.",

            (InvalidJson, En) => "Request body is not valid JSON.",
            (InvalidJson, Fi) => "Pyynnön sisältö ei ole kelvollista JSONia.",
            (InvalidJson, Sv) => "Förfrågans innehåll är inte giltig JSON.",

            (ExpectedObject, En) => "Expected a JSON object.",
            (ExpectedObject, Fi) => "Odotettiin JSON-oliota.",
            (ExpectedObject, Sv) => "Ett JSON-objekt förväntades.",

            (ExpectedList, En) => "Expected a list of items.",
            (ExpectedList, Fi) => "Odotettiin listaa.",
            (ExpectedList, Sv) => "En lista förväntades.",

            (ExpectedLocalizedText, En) => "Expected an object of language codes and texts.",
            (ExpectedLocalizedText, Fi) => "Odotettiin oliota, jossa on kielikoodit ja tekstit.",
            (ExpectedLocalizedText, Sv) => "Ett objekt med språkkoder och texter förväntades.",

            (InvalidDateTime, En) => "Datetime has wrong format. Use RFC 3339.",
            (InvalidDateTime, Fi) => "Aikaleiman muoto on väärä. Käytä RFC 3339 -muotoa.",
            (InvalidDateTime, Sv) => "Tidsstämpeln har fel format. Använd RFC 3339.",

            (InvalidChoice, En) => "Not a valid choice.",
            (InvalidChoice, Fi) => "Arvo ei ole kelvollinen vaihtoehto.",
            (InvalidChoice, Sv) => "Värdet är inte ett giltigt val.",

            (StartTimeInPast, En) => "Start time cannot be in the past.",
            (StartTimeInPast, Fi) => "Alkamisaika ei voi olla menneisyydessä.",
            (StartTimeInPast, Sv) => "Starttiden kan inte vara i det förflutna.",

            (EndTimeInPast, En) => "End time cannot be in the past.",
            (EndTimeInPast, Fi) => "Päättymisaika ei voi olla menneisyydessä.",
            (EndTimeInPast, Sv) => "Sluttiden kan inte vara i det förflutna.",

            (EndBeforeStart, En) => "The event end time cannot be earlier than the start time.",
            (EndBeforeStart, Fi) => "Tapahtuman päättymisaika ei voi olla ennen alkamisaikaa.",
            (EndBeforeStart, Sv) => "Evenemangets sluttid kan inte vara före starttiden.",

            (ExpectedLinkedObject, En) => "Incorrect JSON. Expected a JSON-LD object with an '@id'.",
            (ExpectedLinkedObject, Fi) => "Virheellinen JSON. Odotettiin JSON-LD-oliota, jolla on '@id'.",
            (ExpectedLinkedObject, Sv) => "Felaktig JSON. Ett JSON-LD-objekt med '@id' förväntades.",

            (MissingLinkedId, En) => "The reference has no '@id'.",
            (MissingLinkedId, Fi) => "Viittaukselta puuttuu '@id'.",
            (MissingLinkedId, Sv) => "Referensen saknar '@id'.",

            (EmptyLinkedId, En) => "The '@id' of the reference may not be blank.",
            (EmptyLinkedId, Fi) => "Viittauksen '@id' ei voi olla tyhjä.",
            (EmptyLinkedId, Sv) => "Referensens '@id' får inte vara tomt.",

            (InvalidHyperlink, En) => "Invalid hyperlink - no URL match.",
            (InvalidHyperlink, Fi) => "Virheellinen linkki - URL ei vastaa mitään resurssia.",
            (InvalidHyperlink, Sv) => "Ogiltig länk - URL:en matchar ingen resurs.",

            (WrongResourceType, En) => "Invalid hyperlink - incorrect resource type.",
            (WrongResourceType, Fi) => "Virheellinen linkki - väärä resurssityyppi.",
            (WrongResourceType, Sv) => "Ogiltig länk - fel resurstyp.",

            (ObjectDoesNotExist, En) => "Invalid hyperlink - object does not exist.",
            (ObjectDoesNotExist, Fi) => "Virheellinen linkki - kohdetta ei ole olemassa.",
            (ObjectDoesNotExist, Sv) => "Ogiltig länk - objektet finns inte.",

            (InvalidPage, En) => "Invalid page.",
            (InvalidPage, Fi) => "Virheellinen sivu.",
            (InvalidPage, Sv) => "Ogiltig sida.",
        }
    }
}
