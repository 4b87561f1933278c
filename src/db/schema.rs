/// SQL-şeması: kampüs asistanı yerel veritabanı
///
/// Tarihler "YYYY-MM-DD", tarih-saatler "YYYY-MM-DDTHH:MM:SS",
/// gün içi saatler "HH:MM" metni olarak saklanır. Kontenjan ve
/// çakışma kuralları uygulama katmanında denetlenir.

pub const SCHEMA_VERSION: i32 = 1;

pub const CREATE_TABLES: &str = r#"
-- Bölümler
CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    faculty TEXT NOT NULL
);

-- Öğrenciler
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_number TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    password TEXT NOT NULL,
    department_id INTEGER NOT NULL,
    class_year INTEGER NOT NULL,
    gno REAL NOT NULL DEFAULT 0,
    yno REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (department_id) REFERENCES departments(id)
);

CREATE INDEX IF NOT EXISTS idx_students_number ON students(student_number);
CREATE INDEX IF NOT EXISTS idx_students_department ON students(department_id);

-- Dersler
CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    department_id INTEGER NOT NULL,
    class_year INTEGER NOT NULL,
    semester INTEGER NOT NULL,
    credits INTEGER NOT NULL DEFAULT 0,
    ects INTEGER NOT NULL DEFAULT 0,
    is_mandatory INTEGER NOT NULL DEFAULT 0,
    instructor TEXT NOT NULL DEFAULT '',
    quota INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (department_id) REFERENCES departments(id)
);

CREATE INDEX IF NOT EXISTS idx_courses_department ON courses(department_id);

-- Ders saatleri
CREATE TABLE IF NOT EXISTS course_schedules (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id INTEGER NOT NULL,
    day_of_week TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    classroom TEXT NOT NULL DEFAULT '',
    faculty TEXT NOT NULL DEFAULT '',
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_schedules_course ON course_schedules(course_id);

-- Sınavlar
CREATE TABLE IF NOT EXISTS exams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id INTEGER NOT NULL,
    exam_type TEXT NOT NULL DEFAULT 'midterm',
    exam_date TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    classroom TEXT NOT NULL DEFAULT '',
    faculty TEXT NOT NULL DEFAULT '',
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_exams_course ON exams(course_id);

-- Ders kayıtları
CREATE TABLE IF NOT EXISTS student_courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL,
    course_id INTEGER NOT NULL,
    semester INTEGER NOT NULL,
    academic_year TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'enrolled',
    FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE,
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE,
    UNIQUE (student_id, course_id, semester, academic_year)
);

CREATE INDEX IF NOT EXISTS idx_enrollments_student ON student_courses(student_id);
CREATE INDEX IF NOT EXISTS idx_enrollments_course ON student_courses(course_id);

-- Akademik takvim
CREATE TABLE IF NOT EXISTS academic_calendar (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    event_date TEXT NOT NULL,
    end_date TEXT,
    event_type TEXT NOT NULL DEFAULT 'semester',
    icon TEXT NOT NULL DEFAULT '',
    course_code TEXT
);

-- Duyurular
CREATE TABLE IF NOT EXISTS announcements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS announcement_comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    announcement_id INTEGER NOT NULL,
    student_id INTEGER NOT NULL,
    user_name TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (announcement_id) REFERENCES announcements(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_comments_announcement ON announcement_comments(announcement_id);

CREATE TABLE IF NOT EXISTS announcement_likes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    announcement_id INTEGER NOT NULL,
    student_id INTEGER NOT NULL,
    FOREIGN KEY (announcement_id) REFERENCES announcements(id) ON DELETE CASCADE,
    UNIQUE (announcement_id, student_id)
);

-- Yemekhane menüsü (tarih başına ürün başına bir satır)
CREATE TABLE IF NOT EXISTS cafeteria_menu (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price REAL NOT NULL DEFAULT 0,
    category TEXT NOT NULL DEFAULT 'main',
    available INTEGER NOT NULL DEFAULT 1,
    menu_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_menu_date ON cafeteria_menu(menu_date);

-- Kantin atıştırmalıkları (tarihten bağımsız)
CREATE TABLE IF NOT EXISTS cafeteria_snacks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price REAL NOT NULL DEFAULT 0,
    category TEXT,
    available INTEGER NOT NULL DEFAULT 1
);

-- Kampüs etkinlikleri
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '',
    event_date TEXT NOT NULL,
    organizer TEXT NOT NULL DEFAULT ''
);

-- Öğrenci başına bildirim anahtarları
CREATE TABLE IF NOT EXISTS user_settings (
    student_id INTEGER PRIMARY KEY,
    class_reminders INTEGER NOT NULL DEFAULT 1,
    event_alerts INTEGER NOT NULL DEFAULT 1,
    cafeteria_alerts INTEGER NOT NULL DEFAULT 1,
    announcement_alerts INTEGER NOT NULL DEFAULT 1,
    FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE
);

-- Migrasyon geçmişi
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
