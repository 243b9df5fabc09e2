use crate::models::{Visit, VisitKind};

/// One rendered sidebar entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub visit_type: &'static str,
    pub description: String,
    pub icon: &'static str,
    pub time_spent: String,
    pub detail_icon: &'static str,
    pub detail_value: String,
    pub detail_unit: &'static str,
}

impl ListItem {
    fn from_visit(visit: &Visit) -> Self {
        let visit_type = visit.visit_type();
        let (detail_icon, detail_value, detail_unit) = match &visit.kind {
            VisitKind::Cafe { rating } => ("⭐️", rating.to_string(), "/5"),
            VisitKind::Park { activities } => ("🎯", activities.clone(), ""),
        };

        Self {
            id: visit.id.clone(),
            lat: visit.coords.lat(),
            lng: visit.coords.lng(),
            visit_type: visit_type.as_str(),
            description: visit.description.clone(),
            icon: visit_type.emoji(),
            time_spent: visit.time_spent.to_string(),
            detail_icon,
            detail_value,
            detail_unit,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListView {
    items: Vec<ListItem>,
}

impl ListView {
    pub fn render(&mut self, visit: &Visit) {
        self.items.push(ListItem::from_visit(visit));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coords;

    #[test]
    fn cafe_item_shows_rating() {
        let visit = Visit::new(
            Coords::new(51.5, -0.1),
            "Blue Bottle".to_string(),
            30.0,
            VisitKind::Cafe { rating: 4.0 },
        );
        let mut list = ListView::default();
        list.render(&visit);

        let item = &list.items()[0];
        assert_eq!(item.id, visit.id);
        assert_eq!((item.lat, item.lng), (51.5, -0.1));
        assert_eq!(item.icon, "☕️");
        assert_eq!(item.time_spent, "30");
        assert_eq!(item.detail_icon, "⭐️");
        assert_eq!(item.detail_value, "4");
        assert_eq!(item.detail_unit, "/5");
    }

    #[test]
    fn park_item_shows_activities() {
        let visit = Visit::new(
            Coords::new(51.5, -0.1),
            "Hyde Park".to_string(),
            45.0,
            VisitKind::Park { activities: "frisbee".to_string() },
        );
        let mut list = ListView::default();
        list.render(&visit);

        let item = &list.items()[0];
        assert_eq!(item.icon, "🌳");
        assert_eq!(item.visit_type, "park");
        assert_eq!(item.detail_icon, "🎯");
        assert_eq!(item.detail_value, "frisbee");
        assert_eq!(item.detail_unit, "");
    }

    #[test]
    fn render_appends_and_clear_empties() {
        let mut list = ListView::default();
        for name in ["A", "B"] {
            list.render(&Visit::new(
                Coords::new(0.0, 0.0),
                name.to_string(),
                1.5,
                VisitKind::Cafe { rating: 2.0 },
            ));
        }
        assert_eq!(list.len(), 2);
        assert!(list.items()[0].description.contains("A"));
        assert_eq!(list.items()[1].time_spent, "1.5");

        list.clear();
        assert!(list.is_empty());
    }
}
