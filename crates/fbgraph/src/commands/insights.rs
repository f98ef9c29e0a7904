use tabled::Tabled;

use fbgraph_api::GraphClient;
use fbgraph_api::models::{Insight, Metric, MetricValue, Period};

use crate::cli::{GlobalOpts, InsightsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct InsightRow {
    #[tabled(rename = "Metric")]
    name: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "End time")]
    end_time: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&Insight> for InsightRow {
    fn from(i: &Insight) -> Self {
        let latest = i.latest();
        Self {
            name: i.name.as_ref().map(|m| m.as_str().to_owned()).unwrap_or_default(),
            period: i.period.as_ref().map(|p| p.as_str().to_owned()).unwrap_or_default(),
            end_time: latest
                .and_then(|v| v.end_time)
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            value: latest.map(|v| metric_cell(&v.value)).unwrap_or_default(),
        }
    }
}

fn metric_cell(value: &MetricValue) -> String {
    match value {
        MetricValue::Count(n) => n.to_string(),
        MetricValue::Number(n) => n.to_string(),
        MetricValue::Breakdown(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", output::scalar(v)))
            .collect::<Vec<_>>()
            .join(" "),
        MetricValue::Other(v) => output::scalar(v),
    }
}

pub async fn handle(client: &GraphClient, args: InsightsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let period = args.period.as_deref().map(Period::from_wire);
    let metrics: Vec<Metric> = args.metrics.iter().map(|m| Metric::from_wire(m)).collect();

    let insights = match metrics.as_slice() {
        [single] => client.get_insight(&args.id, single, period.as_ref()).await?,
        many => {
            client
                .get_insights(&args.id, many, period.as_ref(), None)
                .await?
                .into_items()
        }
    };

    let out = output::render_list(global.output, &insights, |i| InsightRow::from(i), |i| {
        i.name.as_ref().map(|m| m.as_str().to_owned()).unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
