/// Regulation identifiers in first-cited order, without duplicates.
#[derive(Debug, Clone, Default)]
pub(crate) struct Citations(Vec<&'static str>);

impl Citations {
    pub(crate) fn cite(&mut self, regulation: &'static str) {
        if !self.0.contains(&regulation) {
            self.0.push(regulation);
        }
    }

    pub(crate) fn cite_all(&mut self, regulations: &[&'static str]) {
        for &regulation in regulations {
            self.cite(regulation);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<&'static str> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_order() {
        let mut citations = Citations::default();
        citations.cite("b");
        citations.cite_all(&["a", "b", "c"]);
        citations.cite("a");
        assert_eq!(citations.into_vec(), vec!["b", "a", "c"]);
    }
}
