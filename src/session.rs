use crate::api::{Connector, Session};
use crate::checks::{CheckError, CheckResult, Probe};
use crate::config::Endpoint;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Runs one probe against `endpoint`: connect, evaluate, disconnect.
///
/// Always yields exactly one result. The session is released after the probe
/// finishes whatever its outcome; nothing is released when connect fails.
pub async fn run_check<C, P>(connector: &C, endpoint: &Endpoint, probe: &P) -> CheckResult
where
    C: Connector,
    P: Probe,
{
    let span = info_span!("check", probe = probe.name(), endpoint = %endpoint.host);
    async move {
        if let Err(err) = endpoint.validate().and_then(|()| probe.validate()) {
            info!(error = %err, "invalid check configuration");
            return CheckResult::from(CheckError::Config(err));
        }

        debug!("opening connection");
        let session = match connector.connect(endpoint).await {
            Ok(session) => session,
            Err(err) => {
                debug!(error = %err, "connect failed");
                error!("unable to open the connection");
                return CheckResult::from(CheckError::Connection {
                    endpoint: endpoint.host.clone(),
                });
            }
        };
        info!("connection established");

        let result = match probe.evaluate(&session).await {
            Ok(result) => result,
            Err(err) => CheckResult::from(err),
        };

        debug!("closing session");
        if let Err(err) = session.disconnect().await {
            warn!(error = %err, "disconnect failed");
        }

        result
    }
    .instrument(span)
    .await
}
