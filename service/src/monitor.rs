use std::collections::BTreeSet;

use model::{sequential_id::SequentialId, verification::VerificationRequest};

#[derive(Debug, PartialEq)]
pub enum MonitorEvent {
    /// First sighting of a pending request.
    New(VerificationRequest),
    /// A pending request passed its deadline and can be canceled for a refund.
    Expired(VerificationRequest),
}

/// Turns successive snapshots of the pending list into events, reporting
/// each request at most once per kind.
#[derive(Debug, Default)]
pub struct Monitor {
    // Requests are issued with increasing nonces, so anything at or below the
    // largest nonce seen so far has already been reported as new.
    largest_seen: Option<u64>,
    reported_expired: BTreeSet<u64>,
}

impl Monitor {
    pub fn observe(&mut self, pending: Vec<VerificationRequest>, now: u64) -> Vec<MonitorEvent> {
        let still_pending: BTreeSet<u64> = pending.iter().map(|r| r.seq_id()).collect();
        self.reported_expired.retain(|n| still_pending.contains(n));

        let mut largest_in_round = self.largest_seen;
        let mut events = vec![];

        for request in pending {
            let seq = request.seq_id();

            if self.largest_seen.map_or(true, |largest| seq > largest) {
                largest_in_round = Some(largest_in_round.map_or(seq, |l| l.max(seq)));
                events.push(MonitorEvent::New(request.clone()));
            }

            if request.is_expired(now) && self.reported_expired.insert(seq) {
                events.push(MonitorEvent::Expired(request));
            }
        }

        self.largest_seen = largest_in_round;
        events
    }
}

#[cfg(test)]
mod tests {
    use model::{
        job::JobId,
        request_id::RequestId,
        verification::{VerificationRequest, VerificationStatus},
    };

    use super::{Monitor, MonitorEvent};

    fn request(nonce: u64, expires_at: u64) -> VerificationRequest {
        VerificationRequest {
            id: RequestId([nonce as u8; 32]),
            nonce,
            subject: "alice.near".parse().unwrap(),
            requester: "bob.near".parse().unwrap(),
            status: VerificationStatus::PENDING,
            escrowed_amount: 1u128.into(),
            oracle_id: "oracle.near".parse().unwrap(),
            job_id: JobId::try_from("509e8dd8de054d3f918640ab0a2b77d8".to_string()).unwrap(),
            created_at: 0u64.into(),
            expires_at: expires_at.into(),
            updated_at: 0u64.into(),
        }
    }

    #[test]
    fn reports_new_requests_once() {
        let mut monitor = Monitor::default();

        let first = monitor.observe(vec![request(0, 100), request(1, 100)], 10);
        assert_eq!(
            first,
            vec![
                MonitorEvent::New(request(0, 100)),
                MonitorEvent::New(request(1, 100)),
            ]
        );

        let second = monitor.observe(vec![request(1, 100), request(2, 100)], 20);
        assert_eq!(second, vec![MonitorEvent::New(request(2, 100))]);

        assert!(monitor.observe(vec![request(2, 100)], 30).is_empty());
    }

    #[test]
    fn reports_expiry_once_per_request() {
        let mut monitor = Monitor::default();

        monitor.observe(vec![request(0, 100)], 50);
        assert_eq!(
            monitor.observe(vec![request(0, 100)], 101),
            vec![MonitorEvent::Expired(request(0, 100))]
        );
        assert!(monitor.observe(vec![request(0, 100)], 102).is_empty());
    }

    #[test]
    fn new_and_expired_in_same_round() {
        let mut monitor = Monitor::default();

        assert_eq!(
            monitor.observe(vec![request(4, 100)], 200),
            vec![
                MonitorEvent::New(request(4, 100)),
                MonitorEvent::Expired(request(4, 100)),
            ]
        );
    }

    #[test]
    fn empty_snapshot_keeps_watermark() {
        let mut monitor = Monitor::default();

        monitor.observe(vec![request(3, 100)], 0);
        assert!(monitor.observe(vec![], 0).is_empty());
        assert!(monitor.observe(vec![request(3, 100)], 0).is_empty());
    }
}
