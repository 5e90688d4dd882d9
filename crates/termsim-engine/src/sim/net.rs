//! Network and process probe simulators: `ping`, `ps`, `top`.
//!
//! Output exists for visual realism; the numeric fields (round-trip times,
//! CPU and memory percentages, load averages) are drawn from the injected
//! generator, so a seeded session reproduces them exactly.

use rand::Rng;
use rand::rngs::StdRng;

use crate::invocation::InvocationState;

pub fn ping(state: &InvocationState, rng: &mut StdRng) -> String {
    let Some(host) = state.nonempty_input("host") else {
        return "ping: missing host operand".to_string();
    };
    let count = match state.nonempty_input("count") {
        Some(v) => match v.parse::<u32>() {
            Ok(n) if (1..=20).contains(&n) => n,
            _ => return format!("ping: bad number of packets to transmit: '{v}'"),
        },
        None => 4,
    };

    let ip = address_for(host);
    let mut lines = vec![format!("PING {host} ({ip}) 56(84) bytes of data.")];

    let mut rtts = Vec::with_capacity(count as usize);
    for seq in 1..=count {
        let rtt: f64 = rng.gen_range(8.0..45.0);
        rtts.push(rtt);
        lines.push(format!(
            "64 bytes from {ip}: icmp_seq={seq} ttl=56 time={rtt:.1} ms"
        ));
    }

    let min = rtts.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = rtts.iter().cloned().fold(0.0, f64::max);
    let avg = rtts.iter().sum::<f64>() / rtts.len() as f64;
    let mdev = rtts.iter().map(|r| (r - avg).abs()).sum::<f64>() / rtts.len() as f64;
    let elapsed = u64::from(count - 1) * 1000 + rng.gen_range(0..40);

    lines.push(String::new());
    lines.push(format!("--- {host} ping statistics ---"));
    lines.push(format!(
        "{count} packets transmitted, {count} received, 0% packet loss, time {elapsed}ms"
    ));
    lines.push(format!(
        "rtt min/avg/max/mdev = {min:.3}/{avg:.3}/{max:.3}/{mdev:.3} ms"
    ));
    lines.join("\n")
}

/// Derive a stable fake address for a host name. Dotted-quad operands pass
/// through unchanged; everything else maps into the TEST-NET-3 block.
fn address_for(host: &str) -> String {
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') && host.contains('.') {
        return host.to_string();
    }
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in host.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    format!("203.0.113.{}", h % 254 + 1)
}

/// The fixed process table behind `ps` and `top`.
/// (pid, user, vsz, rss, tty, stat, start, command)
const PROCESSES: [(u32, &str, u32, u32, &str, &str, &str, &str); 8] = [
    (1, "root", 167780, 11904, "?", "Ss", "Feb01", "/sbin/init"),
    (412, "root", 47240, 5320, "?", "Ss", "Feb01", "/lib/systemd/systemd-journald"),
    (688, "root", 15424, 9032, "?", "Ss", "Feb01", "sshd: /usr/sbin/sshd -D"),
    (974, "root", 55180, 1588, "?", "Ss", "Feb01", "nginx: master process /usr/sbin/nginx"),
    (975, "www-data", 55676, 4908, "?", "S", "Feb01", "nginx: worker process"),
    (1203, "postgres", 214520, 28444, "?", "Ss", "Feb01", "postgres: main"),
    (2201, "user", 13956, 5412, "pts/0", "Ss", "06:26", "-bash"),
    (2245, "user", 11788, 3284, "pts/0", "R+", "06:31", "ps"),
];

pub fn ps(state: &InvocationState, rng: &mut StdRng) -> String {
    let full = state.has_flag("aux") || state.has_flag("-e") || state.has_flag("-f");
    if !full {
        let mut lines = vec!["  PID TTY          TIME CMD".to_string()];
        for (pid, _, _, _, tty, _, _, cmd) in PROCESSES.iter().filter(|p| p.4 != "?") {
            lines.push(format!("{pid:>5} {tty:<12} 00:00:00 {cmd}", cmd = short_cmd(cmd)));
        }
        return lines.join("\n");
    }

    let mut lines =
        vec!["USER       PID %CPU %MEM    VSZ   RSS TTY      STAT START   TIME COMMAND".to_string()];
    for (pid, user, vsz, rss, tty, stat, start, cmd) in PROCESSES {
        let cpu: f64 = rng.gen_range(0.0..4.0);
        let mem: f64 = rng.gen_range(0.1..6.0);
        lines.push(format!(
            "{user:<9} {pid:>4} {cpu:>4.1} {mem:>4.1} {vsz:>6} {rss:>5} {tty:<8} {stat:<4} {start:<5}   0:0{} {cmd}",
            rng.gen_range(0..10)
        ));
    }
    lines.join("\n")
}

fn short_cmd(cmd: &str) -> &str {
    let cmd = cmd.trim_start_matches('-');
    cmd.split_whitespace().next().unwrap_or(cmd)
}

pub fn top(state: &InvocationState, rng: &mut StdRng) -> String {
    let _ = state.nonempty_input("iterations"); // the snapshot renders once
    let l1: f64 = rng.gen_range(0.02..1.60);
    let l5: f64 = rng.gen_range(0.02..1.60);
    let l15: f64 = rng.gen_range(0.02..1.60);
    let us: f64 = rng.gen_range(0.5..12.0);
    let sy: f64 = rng.gen_range(0.2..5.0);
    let idle = 100.0 - us - sy;
    let free: f64 = rng.gen_range(600.0..1800.0);
    let cache: f64 = rng.gen_range(800.0..1600.0);
    let total = 3934.2;
    let used = total - free - cache;

    let mut lines = vec![
        format!(
            "top - 06:31:07 up 42 days,  3:47,  1 user,  load average: {l1:.2}, {l5:.2}, {l15:.2}"
        ),
        format!(
            "Tasks: {} total,   1 running,  {} sleeping,   0 stopped,   0 zombie",
            PROCESSES.len(),
            PROCESSES.len() - 1
        ),
        format!(
            "%Cpu(s): {us:>4.1} us, {sy:>4.1} sy,  0.0 ni, {idle:>4.1} id,  0.0 wa,  0.0 hi,  0.0 si,  0.0 st"
        ),
        format!(
            "MiB Mem : {total:>7.1} total, {free:>7.1} free, {used:>7.1} used, {cache:>7.1} buff/cache"
        ),
        "MiB Swap:  2048.0 total,  2048.0 free,     0.0 used.".to_string(),
        String::new(),
        "  PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND".to_string(),
    ];
    for (pid, user, vsz, rss, _, _, _, cmd) in PROCESSES {
        let cpu: f64 = rng.gen_range(0.0..8.0);
        let mem: f64 = rng.gen_range(0.1..6.0);
        lines.push(format!(
            "{pid:>5} {user:<9} 20   0 {vsz:>7} {rss:>6} {shr:>6} S {cpu:>5.1} {mem:>5.1}   0:0{}.{:02} {cmd}",
            rng.gen_range(0..10),
            rng.gen_range(0..100),
            shr = rss / 2,
            cmd = short_cmd(cmd),
        ));
    }
    lines.join("\n")
}
