use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const EMPLOYEES: usize = 1470;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    /// Pick from `(item, weight)` pairs.
    fn weighted<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut r = self.next_f64() * total;
        for (item, w) in choices {
            if r < *w {
                return item;
            }
            r -= w;
        }
        choices[choices.len() - 1].0
    }
}

struct Employee {
    number: i64,
    age: i64,
    attrition: &'static str,
    business_travel: &'static str,
    department: &'static str,
    distance_from_home: i64,
    environment_satisfaction: i64,
    gender: &'static str,
    job_role: &'static str,
    job_satisfaction: i64,
    monthly_income: i64,
    over_time: &'static str,
    performance_rating: i64,
    relationship_satisfaction: i64,
    total_working_years: i64,
    training_times_last_year: i64,
    work_life_balance: i64,
    years_at_company: i64,
}

fn roles_for(department: &str) -> &'static [(&'static str, f64)] {
    match department {
        "Sales" => &[
            ("Sales Executive", 0.73),
            ("Sales Representative", 0.18),
            ("Manager", 0.09),
        ],
        "Human Resources" => &[("Human Resources", 0.83), ("Manager", 0.17)],
        _ => &[
            ("Research Scientist", 0.30),
            ("Laboratory Technician", 0.27),
            ("Manufacturing Director", 0.15),
            ("Healthcare Representative", 0.14),
            ("Research Director", 0.08),
            ("Manager", 0.06),
        ],
    }
}

fn generate_employee(number: i64, rng: &mut SimpleRng) -> Employee {
    let department = rng.weighted(&[
        ("Research & Development", 0.65),
        ("Sales", 0.30),
        ("Human Resources", 0.05),
    ]);
    let job_role = rng.weighted(roles_for(department));
    let age = rng.gauss(37.0, 9.0).round().clamp(18.0, 60.0) as i64;
    let total_working_years = (age - 18 - rng.range(0, 6)).max(0);
    let years_at_company = rng.range(0, total_working_years.min(40));

    let seniority = match job_role {
        "Manager" | "Research Director" => 3.5,
        "Manufacturing Director" | "Healthcare Representative" | "Sales Executive" => 2.0,
        _ => 1.0,
    };
    let monthly_income = (1500.0 * seniority + 180.0 * total_working_years as f64
        + rng.gauss(0.0, 900.0))
    .clamp(1009.0, 19999.0) as i64;

    let over_time = rng.weighted(&[("Yes", 0.28), ("No", 0.72)]);
    let business_travel = rng.weighted(&[
        ("Non-Travel", 0.10),
        ("Travel_Rarely", 0.71),
        ("Travel_Frequently", 0.19),
    ]);
    let job_satisfaction = rng.range(1, 4);
    let environment_satisfaction = rng.range(1, 4);
    let work_life_balance = match rng.next_f64() {
        r if r < 0.05 => 1,
        r if r < 0.28 => 2,
        r if r < 0.89 => 3,
        _ => 4,
    };

    // Logistic attrition model over the drivers the dashboard explores.
    let logit = -2.2
        + if over_time == "Yes" { 1.4 } else { 0.0 }
        + if business_travel == "Travel_Frequently" { 0.7 } else { 0.0 }
        + if age < 30 { 0.6 } else { 0.0 }
        - 0.25 * (job_satisfaction - 1) as f64
        - 0.2 * (environment_satisfaction - 1) as f64
        - 0.3 * (work_life_balance - 1) as f64
        - 0.05 * years_at_company as f64
        - 0.00008 * monthly_income as f64;
    let leaves = rng.next_f64() < 1.0 / (1.0 + (-logit).exp());

    Employee {
        number,
        age,
        attrition: if leaves { "Yes" } else { "No" },
        business_travel,
        department,
        distance_from_home: rng.range(1, 29),
        environment_satisfaction,
        gender: rng.weighted(&[("Male", 0.6), ("Female", 0.4)]),
        job_role,
        job_satisfaction,
        monthly_income,
        over_time,
        performance_rating: if rng.next_f64() < 0.15 { 4 } else { 3 },
        relationship_satisfaction: rng.range(1, 4),
        total_working_years,
        training_times_last_year: rng.range(0, 6),
        work_life_balance,
        years_at_company,
    }
}

enum Getter {
    Int(fn(&Employee) -> i64),
    Text(fn(&Employee) -> &'static str),
}

/// Output columns in file order.
fn columns() -> Vec<(&'static str, Getter)> {
    use Getter::{Int, Text};
    vec![
        ("Age", Int(|e| e.age)),
        ("Attrition", Text(|e| e.attrition)),
        ("BusinessTravel", Text(|e| e.business_travel)),
        ("Department", Text(|e| e.department)),
        ("DistanceFromHome", Int(|e| e.distance_from_home)),
        ("EmployeeCount", Int(|_| 1)),
        ("EmployeeNumber", Int(|e| e.number)),
        ("EnvironmentSatisfaction", Int(|e| e.environment_satisfaction)),
        ("Gender", Text(|e| e.gender)),
        ("JobRole", Text(|e| e.job_role)),
        ("JobSatisfaction", Int(|e| e.job_satisfaction)),
        ("MonthlyIncome", Int(|e| e.monthly_income)),
        ("OverTime", Text(|e| e.over_time)),
        ("PerformanceRating", Int(|e| e.performance_rating)),
        ("RelationshipSatisfaction", Int(|e| e.relationship_satisfaction)),
        ("TotalWorkingYears", Int(|e| e.total_working_years)),
        ("TrainingTimesLastYear", Int(|e| e.training_times_last_year)),
        ("WorkLifeBalance", Int(|e| e.work_life_balance)),
        ("YearsAtCompany", Int(|e| e.years_at_company)),
    ]
}

fn write_csv(path: &Path, employees: &[Employee]) -> Result<()> {
    let cols = columns();
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(cols.iter().map(|(name, _)| *name))?;
    for e in employees {
        writer.write_record(cols.iter().map(|(_, get)| match get {
            Getter::Int(f) => f(e).to_string(),
            Getter::Text(f) => f(e).to_string(),
        }))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, employees: &[Employee]) -> Result<()> {
    let cols = columns();
    let schema = Arc::new(Schema::new(
        cols.iter()
            .map(|(name, get)| {
                let dt = match get {
                    Getter::Int(_) => DataType::Int64,
                    Getter::Text(_) => DataType::Utf8,
                };
                Field::new(*name, dt, false)
            })
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = cols
        .iter()
        .map(|(_, get)| -> ArrayRef {
            match get {
                Getter::Int(f) => {
                    Arc::new(Int64Array::from(employees.iter().map(f).collect::<Vec<_>>()))
                }
                Getter::Text(f) => {
                    Arc::new(StringArray::from(employees.iter().map(f).collect::<Vec<_>>()))
                }
            }
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args().nth(1).unwrap_or_else(|| "EA.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let employees: Vec<Employee> = (1..=EMPLOYEES as i64)
        .map(|n| generate_employee(n, &mut rng))
        .collect();

    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("parquet")) {
        write_parquet(path, &employees)?;
    } else {
        write_csv(path, &employees)?;
    }

    let leavers = employees.iter().filter(|e| e.attrition == "Yes").count();
    println!(
        "Wrote {} employees ({leavers} with attrition) to {output}",
        employees.len()
    );
    Ok(())
}
