use crate::models::{ApartmentHit, SearchCriteria};

/// Which price dimension a query is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sale,
    Jeonse,
    Monthly,
}

impl Category {
    /// Jeonse if a deposit bound is set, else monthly if a rent bound is
    /// set, else sale.
    pub fn infer(criteria: &SearchCriteria) -> Self {
        if criteria.min_deposit.is_some() || criteria.max_deposit.is_some() {
            Category::Jeonse
        } else if criteria.min_monthly_rent.is_some() || criteria.max_monthly_rent.is_some() {
            Category::Monthly
        } else {
            Category::Sale
        }
    }

    /// The hit's price field for this category
    pub fn price_of(self, hit: &ApartmentHit) -> Option<f64> {
        match self {
            Category::Sale => hit.average_price,
            Category::Jeonse => hit.average_deposit,
            Category::Monthly => hit.average_monthly_rent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Sale => "매매",
            Category::Jeonse => "전세",
            Category::Monthly => "월세",
        }
    }
}

fn is_positive(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}

/// Keep only hits whose price for the inferred category is a positive number.
pub fn filter_hits(criteria: &SearchCriteria, hits: Vec<ApartmentHit>) -> Vec<ApartmentHit> {
    let category = Category::infer(criteria);
    hits.into_iter()
        .filter(|hit| is_positive(category.price_of(hit)))
        .collect()
}

/// Price text shown next to a listing. Amounts are in 만원.
pub fn display_price(hit: &ApartmentHit, category: Category) -> String {
    match (category, category.price_of(hit)) {
        (Category::Jeonse, Some(deposit)) if deposit > 0.0 => {
            format!("전세 {:.1}억원", deposit / 10000.0)
        }
        (Category::Monthly, Some(rent)) if rent > 0.0 => format!("월세 {}만원", rent),
        (Category::Sale, Some(price)) if price > 0.0 => format!("{:.1}억원", price / 10000.0),
        _ => "정보 없음".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::hit;

    #[test]
    fn test_category_inference() {
        let mut criteria = SearchCriteria::default();
        assert_eq!(Category::infer(&criteria), Category::Sale);

        criteria.max_monthly_rent = Some(100.0);
        assert_eq!(Category::infer(&criteria), Category::Monthly);

        // Deposit bounds win over rent bounds
        criteria.min_deposit = Some(5000.0);
        assert_eq!(Category::infer(&criteria), Category::Jeonse);

        let criteria = SearchCriteria {
            min_price: Some(50000.0),
            ..Default::default()
        };
        assert_eq!(Category::infer(&criteria), Category::Sale);
    }

    #[test]
    fn test_jeonse_filter_keeps_only_positive_deposits() {
        let criteria = SearchCriteria {
            min_deposit: Some(10000.0),
            ..Default::default()
        };
        let hits = vec![
            hit(1, None, Some(0.0), None),
            hit(2, None, Some(5000.0), None),
            hit(3, None, None, Some(50.0)),
        ];

        let kept = filter_hits(&criteria, hits);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].apt_id, 2);
    }

    #[test]
    fn test_sale_filter_is_default() {
        let hits = vec![
            hit(1, Some(120000.0), None, None),
            hit(2, None, Some(30000.0), None),
            hit(3, Some(-1.0), None, None),
            hit(4, Some(f64::NAN), None, None),
        ];

        let kept = filter_hits(&SearchCriteria::default(), hits);
        assert_eq!(kept.iter().map(|h| h.apt_id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_display_price() {
        let h = hit(1, Some(125000.0), Some(30000.0), Some(85.0));
        assert_eq!(display_price(&h, Category::Sale), "12.5억원");
        assert_eq!(display_price(&h, Category::Jeonse), "전세 3.0억원");
        assert_eq!(display_price(&h, Category::Monthly), "월세 85만원");

        let empty = hit(2, None, None, None);
        assert_eq!(display_price(&empty, Category::Jeonse), "정보 없음");
    }
}
