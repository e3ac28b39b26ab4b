use crate::error::Result;
use crate::model::MergedRecord;
use crate::query::criteria::QueryCriteria;
use regex::Regex;

/// Apply the criteria to the merged set.
///
/// Number selection comes first: unless `all` is requested, each requested
/// number picks the first record carrying it, in request order. System,
/// job name and message id then narrow the selection in that order, each
/// keeping records whose field contains the criterion.
///
/// An empty result is returned as is; the caller decides whether it is an
/// error.
pub fn filter_requests(
    merged: &[MergedRecord],
    criteria: &QueryCriteria,
) -> Result<Vec<MergedRecord>> {
    let mut selected: Vec<MergedRecord> = if criteria.selects_all() {
        merged.to_vec()
    } else {
        criteria
            .request_number_list
            .iter()
            .filter_map(|number| merged.iter().find(|r| &r.number == number))
            .cloned()
            .collect()
    };

    if let Some(system) = &criteria.system {
        selected = retain_matching(selected, system, |r| &r.system)?;
    }
    if let Some(job_name) = &criteria.job_name {
        selected = retain_matching(selected, job_name, |r| &r.jobname)?;
    }
    if let Some(message_id) = &criteria.message_id {
        selected = retain_matching(selected, message_id, |r| &r.message_id)?;
    }

    Ok(selected)
}

fn retain_matching<F>(
    records: Vec<MergedRecord>,
    condition: &str,
    field: F,
) -> Result<Vec<MergedRecord>>
where
    F: Fn(&MergedRecord) -> &String,
{
    let condition = condition.to_ascii_uppercase();
    let condition = condition.trim_matches('*');
    if condition.is_empty() {
        return Ok(records);
    }

    // Search, not full match: "MV2" selects both MV27 and MV29.
    let re = Regex::new(&regex::escape(condition))?;
    Ok(records
        .into_iter()
        .filter(|r| re.is_match(field(r)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(number: &str, system: &str, jobname: &str, message_id: &str) -> MergedRecord {
        MergedRecord {
            number: number.to_string(),
            reply_type: 'R',
            system: system.to_string(),
            job_id: None,
            message_text: format!("*{number} {message_id}"),
            jobname: jobname.to_string(),
            message_id: message_id.to_string(),
        }
    }

    fn sample() -> Vec<MergedRecord> {
        vec![
            record("001", "MV27", "IM5HCONN", "HWSC0000I"),
            record("002", "MV29", "IM5HCTRL", "DFS3139I"),
            record("003", "MV2H", "MQ1ACHIN", "DSI802A"),
        ]
    }

    fn numbers(records: &[MergedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.number.as_str()).collect()
    }

    #[test]
    fn all_keeps_everything_in_order() {
        let merged = sample();
        let out = filter_requests(&merged, &QueryCriteria::default()).unwrap();
        assert_eq!(out, merged);
    }

    #[test]
    fn all_is_case_insensitive() {
        let criteria = QueryCriteria {
            request_number_list: vec!["001".to_string(), "ALL".to_string()],
            ..QueryCriteria::default()
        };
        assert_eq!(filter_requests(&sample(), &criteria).unwrap().len(), 3);
    }

    #[test]
    fn number_selection_is_exact_string_match() {
        let merged = vec![record("001", "MV27", "A", "B"), record("002", "MV27", "C", "D")];
        let criteria = QueryCriteria {
            request_number_list: vec!["002".to_string()],
            ..QueryCriteria::default()
        };
        let out = filter_requests(&merged, &criteria).unwrap();
        assert_eq!(out, vec![merged[1].clone()]);

        let criteria = QueryCriteria {
            request_number_list: vec!["02".to_string()],
            ..QueryCriteria::default()
        };
        assert!(filter_requests(&merged, &criteria).unwrap().is_empty());
    }

    #[test]
    fn number_selection_follows_request_order_and_takes_first_match() {
        let mut merged = sample();
        merged.push(record("001", "MV99", "DUP", "DUP"));
        let criteria = QueryCriteria {
            request_number_list: vec!["003".to_string(), "001".to_string(), "404".to_string()],
            ..QueryCriteria::default()
        };
        let out = filter_requests(&merged, &criteria).unwrap();
        assert_eq!(numbers(&out), vec!["003", "001"]);
        assert_eq!(out[1].system, "MV27");
    }

    #[test]
    fn system_prefix_matches_by_substring() {
        let criteria = QueryCriteria {
            system: Some("MV2".to_string()),
            ..QueryCriteria::default()
        };
        let out = filter_requests(&sample(), &criteria).unwrap();
        assert_eq!(numbers(&out), vec!["001", "002", "003"]);

        let criteria = QueryCriteria {
            system: Some("V29".to_string()),
            ..QueryCriteria::default()
        };
        assert_eq!(numbers(&filter_requests(&sample(), &criteria).unwrap()), vec!["002"]);
    }

    #[test]
    fn attribute_filters_are_conjunctive() {
        let criteria = QueryCriteria {
            system: Some("MV2".to_string()),
            job_name: Some("IM5".to_string()),
            message_id: Some("DFS".to_string()),
            ..QueryCriteria::default()
        };
        let out = filter_requests(&sample(), &criteria).unwrap();
        assert_eq!(numbers(&out), vec!["002"]);
    }

    #[test]
    fn attribute_filters_apply_after_number_selection() {
        let criteria = QueryCriteria {
            request_number_list: vec!["001".to_string()],
            message_id: Some("DSI".to_string()),
            ..QueryCriteria::default()
        };
        assert!(filter_requests(&sample(), &criteria).unwrap().is_empty());
    }

    #[test]
    fn lone_wildcard_matches_everything() {
        let criteria = QueryCriteria {
            system: Some("*".to_string()),
            job_name: Some("*".to_string()),
            ..QueryCriteria::default()
        };
        assert_eq!(filter_requests(&sample(), &criteria).unwrap().len(), 3);
    }

    #[test]
    fn unmatched_criteria_give_empty_result() {
        let criteria = QueryCriteria {
            system: Some("ZZ".to_string()),
            ..QueryCriteria::default()
        };
        assert!(filter_requests(&sample(), &criteria).unwrap().is_empty());
    }
}
