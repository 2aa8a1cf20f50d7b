use percent_encoding::percent_decode_str;

/// Decoded key/value pairs of an urlencoded form body.
#[derive(Debug)]
pub struct PostData {
    params: Vec<(String, String)>,
}

impl PostData {
    pub fn from_string(body: &str) -> Self {
        let params = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();

        Self { params }
    }

    /// First value stored under `key`, if any.
    pub fn read_value(&self, key: &str) -> Option<String> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn is_key_exists(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k == key)
    }
}

// Form encoding sends spaces as '+'.
fn decode_component(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pairs_and_decodes() {
        let data = PostData::from_string("ssid=Home%20Net&pass=s3cret&port=1883");

        assert_eq!(data.read_value("ssid"), Some("Home Net".to_string()));
        assert_eq!(data.read_value("pass"), Some("s3cret".to_string()));
        assert_eq!(data.read_value("port"), Some("1883".to_string()));
    }

    #[test]
    fn plus_decodes_as_space() {
        let data = PostData::from_string("name=living+room+fern");

        assert_eq!(data.read_value("name"), Some("living room fern".to_string()));
    }

    #[test]
    fn missing_value_reads_as_empty() {
        let data = PostData::from_string("host=&token");

        assert!(data.is_key_exists("host"));
        assert_eq!(data.read_value("host"), Some(String::new()));
        assert_eq!(data.read_value("token"), Some(String::new()));
    }

    #[test]
    fn absent_key_reads_as_none() {
        let data = PostData::from_string("ssid=abc");

        assert!(!data.is_key_exists("pass"));
        assert_eq!(data.read_value("pass"), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let data = PostData::from_string("id=1&id=2");

        assert_eq!(data.read_value("id"), Some("1".to_string()));
    }

    #[test]
    fn empty_body_has_no_keys() {
        let data = PostData::from_string("");

        assert!(!data.is_key_exists("ssid"));
    }
}
