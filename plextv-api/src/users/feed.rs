use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::models::{Attributes, ServerRecord, UserRecord};
use crate::error::PlexTvError;

const USER_TAG: &[u8] = b"User";
const SERVER_TAG: &[u8] = b"Server";

fn attributes(element: &BytesStart<'_>) -> Result<Attributes, PlexTvError> {
    let mut attributes = Attributes::new();
    for attr in element.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(attributes)
}

/// Accumulates the user currently open in the feed and its servers.
#[derive(Default)]
struct FeedState {
    users: Vec<UserRecord>,
    pending_user: Option<Attributes>,
    pending_servers: Vec<ServerRecord>,
}

impl FeedState {
    fn open(&mut self, element: &BytesStart<'_>) -> Result<(), PlexTvError> {
        match element.name().as_ref() {
            USER_TAG => {
                self.pending_servers.clear();
                self.pending_user = Some(attributes(element)?);
            }
            SERVER_TAG => {
                if self.pending_user.is_some() {
                    let server = ServerRecord::from_attributes(&attributes(element)?);
                    self.pending_servers.push(server);
                } else {
                    tracing::debug!("Ignoring Server element outside of a User");
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        if name != USER_TAG {
            return;
        }
        if let Some(user) = self.pending_user.take() {
            let servers = std::mem::take(&mut self.pending_servers);
            self.users.push(UserRecord::from_attributes(&user, servers));
        }
    }
}

/// Parses the sharing feed in a single streaming pass, returning users in
/// document order with their servers attached.
pub fn parse_users(xml: &str) -> Result<Vec<UserRecord>, PlexTvError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = FeedState::default();
    let mut depth = 0usize;
    let mut seen_element = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                seen_element = true;
                state.open(&e)?;
            }
            Event::Empty(e) => {
                seen_element = true;
                state.open(&e)?;
                state.close(e.name().as_ref());
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                state.close(e.name().as_ref());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_element {
        return Err(PlexTvError::Xml("document contains no elements".to_string()));
    }
    if depth != 0 {
        return Err(PlexTvError::Xml(format!(
            "unexpected end of document with {} unclosed element(s)",
            depth
        )));
    }

    tracing::debug!(users = state.users.len(), "Parsed sharing feed");

    Ok(state.users)
}
